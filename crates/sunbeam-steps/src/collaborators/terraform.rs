//! Aplicador terraform sobre un directorio de plan.
//!
//! Antes de `init` se escribe `backend.tf.json` con el backend elegido:
//! - `http`: la dirección del estado llega por `TF_HTTP_ADDRESS`
//!   (`<http_address>/<plan>`); sin dirección configurada no se inicializa.
//! - `local`: el estado vive en `<data_location>/<plan>.tfstate`.
//!
//! `apply` vuelca las variables a `terraform.tfvars.json`.
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde_json::{json, Value};

use super::command::run_checked;
use super::TerraformApplier;
use crate::errors::CollaboratorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    Http,
    Local,
}

impl FromStr for StateBackend {
    type Err = CollaboratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(StateBackend::Http),
            "local" => Ok(StateBackend::Local),
            other => Err(CollaboratorError::Config(format!("unsupported terraform backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerraformHelper {
    path: PathBuf,
    plan: String,
    parallelism: u32,
    backend: StateBackend,
    data_location: PathBuf,
    http_address: Option<String>,
    binary: String,
}

impl TerraformHelper {
    pub fn new(path: PathBuf, plan: impl Into<String>, parallelism: u32, backend: StateBackend, data_location: PathBuf) -> Self {
        Self { path,
               plan: plan.into(),
               parallelism: parallelism.max(1),
               backend,
               data_location,
               http_address: None,
               binary: "terraform".to_string() }
    }

    /// Base del servidor de estado para el backend `http`.
    pub fn with_http_address(mut self, address: impl Into<String>) -> Self {
        self.http_address = Some(address.into());
        self
    }

    /// Dirección del estado de este plan; `Config` si el backend es `http` y
    /// no hay dirección.
    pub fn state_address(&self) -> Result<Option<String>, CollaboratorError> {
        match (self.backend, self.http_address.as_deref()) {
            (StateBackend::Local, _) => Ok(None),
            (StateBackend::Http, Some(base)) if !base.trim().is_empty() => {
                Ok(Some(format!("{}/{}", base.trim().trim_end_matches('/'), self.plan)))
            }
            (StateBackend::Http, _) => {
                Err(CollaboratorError::Config(format!("terraform plan {} uses the http backend but no state address is set",
                                                      self.plan)))
            }
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contenido de `backend.tf.json` para el backend configurado.
    pub fn backend_config(&self) -> Value {
        match self.backend {
            StateBackend::Http => json!({ "terraform": { "backend": { "http": {} } } }),
            StateBackend::Local => {
                let state = self.data_location.join(format!("{}.tfstate", self.plan));
                json!({ "terraform": { "backend": { "local": { "path": state.display().to_string() } } } })
            }
        }
    }

    fn write_json(&self, file: &str, value: &Value) -> Result<(), CollaboratorError> {
        fs::create_dir_all(&self.path)?;
        fs::write(self.path.join(file), serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }

    fn terraform(&self, args: &[&str]) -> Result<String, CollaboratorError> {
        let mut env = vec![("TF_IN_AUTOMATION".to_string(), "1".to_string())];
        if let Some(address) = self.state_address()? {
            env.push(("TF_HTTP_ADDRESS".to_string(), address));
        }
        run_checked(&self.binary, args, Some(&self.path), &env, None)
    }
}

impl TerraformApplier for TerraformHelper {
    fn plan_name(&self) -> &str {
        &self.plan
    }

    fn init(&self) -> Result<(), CollaboratorError> {
        debug!("Initializing terraform plan {} in {}", self.plan, self.path.display());
        self.state_address()?;
        self.write_json("backend.tf.json", &self.backend_config())?;
        self.terraform(&["init", "-upgrade", "-no-color", "-input=false"]).map(|_| ())
    }

    fn apply(&self, vars: &Value) -> Result<(), CollaboratorError> {
        debug!("Applying terraform plan {}", self.plan);
        self.write_json("terraform.tfvars.json", vars)?;
        let parallelism = format!("-parallelism={}", self.parallelism);
        self.terraform(&["apply", "-auto-approve", "-no-color", "-input=false", &parallelism]).map(|_| ())
    }
}
