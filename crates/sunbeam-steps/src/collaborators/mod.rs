//! Contratos de los sistemas externos que tocan los steps.
//!
//! El executor nunca llama a estos traits: sólo los steps, que reciben los
//! handles en su constructor.

pub mod cluster;
mod command;
pub mod juju;
pub mod terraform;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sunbeam_core::Role;

use crate::errors::CollaboratorError;

pub use cluster::LocalClusterService;
pub use juju::JujuCli;
pub use terraform::TerraformHelper;

/// Usuario Juju registrado en la base del cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JujuUser {
    pub name: String,
    pub token: String,
}

/// Datos públicos de un controller Juju.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInfo {
    pub name: String,
    pub api_endpoints: Vec<String>,
    pub ca_cert: String,
}

/// Servicio de membresía del cluster.
pub trait ClusterService {
    fn is_bootstrapped(&self) -> Result<bool, CollaboratorError>;
    fn bootstrap(&self, node_name: &str, role: Role) -> Result<(), CollaboratorError>;
    fn get_config(&self, key: &str) -> Result<Option<String>, CollaboratorError>;
    fn update_config(&self, key: &str, value: &str) -> Result<(), CollaboratorError>;
    fn get_juju_user(&self, name: &str) -> Result<Option<JujuUser>, CollaboratorError>;
    /// Alta o reemplazo del token de un usuario.
    fn add_juju_user(&self, name: &str, token: &str) -> Result<(), CollaboratorError>;
}

/// Controller / gestor de modelos Juju.
pub trait JujuController {
    fn controller_exists(&self, controller: &str) -> Result<bool, CollaboratorError>;
    fn bootstrap(&self, cloud_name: &str, cloud_type: &str, controller: &str) -> Result<(), CollaboratorError>;
    fn show_controller(&self, controller: &str) -> Result<ControllerInfo, CollaboratorError>;

    fn user_exists(&self, user: &str) -> Result<bool, CollaboratorError>;
    /// Crea el usuario y devuelve su token de registro.
    fn add_user(&self, user: &str) -> Result<String, CollaboratorError>;
    fn remove_user(&self, user: &str) -> Result<(), CollaboratorError>;
    fn register_user(&self, token: &str, password: &str, controller: &str, replace: bool) -> Result<(), CollaboratorError>;
    /// Directorio de datos del cliente juju (accounts.yaml, controllers.yaml).
    fn data_dir(&self) -> PathBuf;

    fn application_exists(&self, model: &str, application: &str) -> Result<bool, CollaboratorError>;
    /// Id de máquina cuyo hostname coincide con `hostname`.
    fn machine_for_host(&self, model: &str, hostname: &str) -> Result<Option<String>, CollaboratorError>;
    fn unit_on_machine(&self, model: &str, application: &str, machine: &str) -> Result<Option<String>, CollaboratorError>;
    fn add_unit(&self, model: &str, application: &str, machine: &str) -> Result<(), CollaboratorError>;

    fn cloud_exists(&self, cloud: &str) -> Result<bool, CollaboratorError>;
    /// Kubeconfig expuesto por una unidad de la aplicación.
    fn kubeconfig(&self, model: &str, application: &str) -> Result<String, CollaboratorError>;
    fn add_k8s_cloud(&self, cloud: &str, controller: &str, kubeconfig: &str) -> Result<(), CollaboratorError>;

    fn wait_application_ready(&self, model: &str, application: &str, timeout: Duration) -> Result<(), CollaboratorError>;
    fn wait_model_ready(&self, model: &str, timeout: Duration) -> Result<(), CollaboratorError>;
}

/// Aplicador de infraestructura como código (un plan terraform).
pub trait TerraformApplier {
    /// Nombre del plan (p.ej. `microk8s-plan`).
    fn plan_name(&self) -> &str;
    fn init(&self) -> Result<(), CollaboratorError>;
    fn apply(&self, vars: &Value) -> Result<(), CollaboratorError>;
}
