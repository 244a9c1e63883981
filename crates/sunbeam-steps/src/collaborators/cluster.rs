//! Servicio de cluster respaldado por un documento JSON local.
//!
//! Guarda el estado de bootstrap del nodo, la configuración clave/valor y los
//! usuarios Juju en `<data_location>/cluster.json`. Cada operación lee y
//! reescribe el documento completo.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use sunbeam_core::Role;

use super::{ClusterService, JujuUser};
use crate::errors::CollaboratorError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ClusterDocument {
    #[serde(default)]
    nodes: Vec<ClusterNode>,
    #[serde(default)]
    config: BTreeMap<String, String>,
    #[serde(default)]
    juju_users: Vec<JujuUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClusterNode {
    name: String,
    role: String,
}

#[derive(Debug, Clone)]
pub struct LocalClusterService {
    path: PathBuf,
}

impl LocalClusterService {
    pub fn new(data_location: &Path) -> Self {
        Self { path: data_location.join("cluster.json") }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ClusterDocument, CollaboratorError> {
        if !self.path.exists() {
            return Ok(ClusterDocument::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn store(&self, doc: &ClusterDocument) -> Result<(), CollaboratorError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(doc)?)?;
        Ok(())
    }
}

impl ClusterService for LocalClusterService {
    fn is_bootstrapped(&self) -> Result<bool, CollaboratorError> {
        Ok(!self.load()?.nodes.is_empty())
    }

    fn bootstrap(&self, node_name: &str, role: Role) -> Result<(), CollaboratorError> {
        let mut doc = self.load()?;
        if !doc.nodes.is_empty() {
            return Err(CollaboratorError::Config(format!("cluster at {} already bootstrapped", self.path.display())));
        }
        debug!("Bootstrapping cluster with node {node_name} as {}", role.cluster_role());
        doc.nodes.push(ClusterNode { name: node_name.to_string(),
                                     role: role.cluster_role().to_string() });
        self.store(&doc)
    }

    fn get_config(&self, key: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(self.load()?.config.get(key).cloned())
    }

    fn update_config(&self, key: &str, value: &str) -> Result<(), CollaboratorError> {
        let mut doc = self.load()?;
        doc.config.insert(key.to_string(), value.to_string());
        self.store(&doc)
    }

    fn get_juju_user(&self, name: &str) -> Result<Option<JujuUser>, CollaboratorError> {
        Ok(self.load()?.juju_users.into_iter().find(|u| u.name == name))
    }

    fn add_juju_user(&self, name: &str, token: &str) -> Result<(), CollaboratorError> {
        let mut doc = self.load()?;
        doc.juju_users.retain(|u| u.name != name);
        doc.juju_users.push(JujuUser { name: name.to_string(),
                                       token: token.to_string() });
        self.store(&doc)
    }
}
