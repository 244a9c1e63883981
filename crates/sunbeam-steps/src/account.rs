//! Cuenta Juju del nodo guardada localmente.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::JUJU_ACCOUNT_FILE;
use crate::errors::CollaboratorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JujuAccount {
    pub user: String,
    pub password: String,
}

impl JujuAccount {
    /// Genera una cuenta con password aleatoria.
    pub fn generate(user: &str) -> Self {
        Self { user: user.to_string(),
               password: uuid::Uuid::new_v4().simple().to_string() }
    }

    pub fn path(data_location: &Path) -> PathBuf {
        data_location.join(JUJU_ACCOUNT_FILE)
    }

    pub fn load(data_location: &Path) -> Result<Option<Self>, CollaboratorError> {
        let path = Self::path(data_location);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, data_location: &Path) -> Result<PathBuf, CollaboratorError> {
        fs::create_dir_all(data_location)?;
        let path = Self::path(data_location);
        fs::write(&path, serde_json::to_vec_pretty(self)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(JujuAccount::load(dir.path()).unwrap(), None);
        let acc = JujuAccount::generate("node1.local");
        acc.save(dir.path()).unwrap();
        assert_eq!(JujuAccount::load(dir.path()).unwrap(), Some(acc.clone()));
        assert_eq!(acc.password.len(), 32);
    }
}
