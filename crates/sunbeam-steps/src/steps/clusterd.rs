//! Steps contra el servicio de cluster.
use std::rc::Rc;

use sunbeam_core::{ExecutionContext, Role, StepDefinition, StepIdentity, StepPayload, StepResult};

use super::failed;
use crate::collaborators::{ClusterService, JujuController};
use crate::constants::JUJU_CONTROLLER_KEY;

/// Inicializa el cluster con este nodo como primer miembro.
pub struct ClusterInitStep {
    cluster: Rc<dyn ClusterService>,
    node_name: String,
    role: Role,
}

impl ClusterInitStep {
    pub fn new(cluster: Rc<dyn ClusterService>, node_name: &str, role: Role) -> Self {
        Self { cluster,
               node_name: node_name.to_string(),
               role }
    }
}

impl StepIdentity for ClusterInitStep {
    const ID: &'static str = "cluster_init";
}

impl StepDefinition for ClusterInitStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Bootstrapping Sunbeam cluster"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.cluster.is_bootstrapped() {
            Ok(true) => return StepResult::skipped_because("cluster already bootstrapped"),
            Ok(false) => {}
            Err(e) => return failed("Error checking cluster state", e),
        }
        match self.cluster.bootstrap(&self.node_name, self.role) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error bootstrapping cluster", e),
        }
    }
}

/// Guarda en el cluster los datos públicos del controller Juju.
pub struct ClusterUpdateJujuControllerStep {
    cluster: Rc<dyn ClusterService>,
    juju: Rc<dyn JujuController>,
    controller: String,
}

impl ClusterUpdateJujuControllerStep {
    pub fn new(cluster: Rc<dyn ClusterService>, juju: Rc<dyn JujuController>, controller: &str) -> Self {
        Self { cluster,
               juju,
               controller: controller.to_string() }
    }
}

impl StepIdentity for ClusterUpdateJujuControllerStep {
    const ID: &'static str = "cluster_update_juju_controller";
}

impl StepDefinition for ClusterUpdateJujuControllerStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Add Juju controller to cluster DB"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.cluster.get_config(JUJU_CONTROLLER_KEY) {
            Ok(Some(existing)) => {
                return match serde_json::from_str(&existing) {
                    Ok(value) => StepResult::skipped_with(StepPayload::Json(value)),
                    Err(e) => failed("Error decoding stored Juju controller", e.into()),
                };
            }
            Ok(None) => {}
            Err(e) => return failed("Error reading cluster config", e),
        }
        let info = match self.juju.show_controller(&self.controller) {
            Ok(info) => info,
            Err(e) => return failed("Error reading Juju controller details", e),
        };
        let value = match serde_json::to_value(&info) {
            Ok(v) => v,
            Err(e) => return StepResult::failed(format!("Error encoding controller details: {e}")),
        };
        match self.cluster.update_config(JUJU_CONTROLLER_KEY, &value.to_string()) {
            Ok(()) => StepResult::completed_with(StepPayload::Json(value)),
            Err(e) => failed("Error storing Juju controller in cluster DB", e),
        }
    }
}

/// Registra el usuario Juju del nodo (y su token) en la base del cluster.
pub struct ClusterAddJujuUserStep {
    cluster: Rc<dyn ClusterService>,
    name: String,
    token: Option<String>,
}

impl ClusterAddJujuUserStep {
    /// `token` viene del resultado de `CreateJujuUserStep` de un plan anterior.
    pub fn new(cluster: Rc<dyn ClusterService>, name: &str, token: Option<String>) -> Self {
        Self { cluster,
               name: name.to_string(),
               token }
    }
}

impl StepIdentity for ClusterAddJujuUserStep {
    const ID: &'static str = "cluster_add_juju_user";
}

impl StepDefinition for ClusterAddJujuUserStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Add Juju user to cluster DB"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        let stored = match self.cluster.get_juju_user(&self.name) {
            Ok(stored) => stored,
            Err(e) => return failed("Error reading Juju users from cluster DB", e),
        };
        // un token nuevo reemplaza al guardado: el anterior dejó de ser válido
        let token = match (stored, self.token.as_deref()) {
            (Some(user), Some(token)) if user.token == token => {
                return StepResult::skipped_because("user already in cluster DB")
            }
            (Some(_), None) => return StepResult::skipped_because("user already in cluster DB"),
            (_, Some(token)) => token,
            (None, None) => {
                return StepResult::failed(format!("No registration token available for Juju user {}", self.name))
            }
        };
        match self.cluster.add_juju_user(&self.name, token) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error adding Juju user to cluster DB", e),
        }
    }
}
