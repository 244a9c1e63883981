//! Checks de preflight.
use std::env;
use std::ffi::OsString;
use std::path::Path;

use sunbeam_core::{Check, CheckOutcome, EngineError};

/// Verifica que el binario `juju` esté en el PATH.
pub struct JujuSnapCheck {
    search_path: Option<OsString>,
}

impl JujuSnapCheck {
    pub fn new() -> Self {
        Self { search_path: env::var_os("PATH") }
    }

    /// Busca en un PATH explícito en lugar del del proceso.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self { search_path: Some(path.into()) }
    }

    fn juju_present(&self) -> bool {
        let Some(paths) = &self.search_path else {
            return false;
        };
        env::split_paths(paths).any(|dir| is_executable(&dir.join("juju")))
    }
}

impl Default for JujuSnapCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl Check for JujuSnapCheck {
    fn name(&self) -> &str {
        "juju_snap"
    }

    fn description(&self) -> &str {
        "Checking for presence of Juju"
    }

    fn run(&self) -> Result<CheckOutcome, EngineError> {
        if self.juju_present() {
            Ok(CheckOutcome::Passed)
        } else {
            Ok(CheckOutcome::Failed { message: "juju not installed".to_string() })
        }
    }
}
