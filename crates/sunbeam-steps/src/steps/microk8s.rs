//! Steps de despliegue de MicroK8S en el modelo del controller.
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use sunbeam_core::{ExecutionContext, StepDefinition, StepIdentity, StepPayload, StepResult};

use super::failed;
use crate::collaborators::{JujuController, TerraformApplier};
use crate::constants::{CONTROLLER_MODEL, MICROK8S_APPLICATION, MICROK8S_CLOUD, MICROK8S_DEPLOY_TIMEOUT_SECS};

/// Despliega la aplicación microk8s con terraform y espera a que esté activa.
pub struct DeployMicrok8sApplicationStep {
    tf: Rc<dyn TerraformApplier>,
    juju: Rc<dyn JujuController>,
    timeout: Duration,
}

impl DeployMicrok8sApplicationStep {
    pub fn new(tf: Rc<dyn TerraformApplier>, juju: Rc<dyn JujuController>) -> Self {
        Self { tf,
               juju,
               timeout: Duration::from_secs(MICROK8S_DEPLOY_TIMEOUT_SECS) }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl StepIdentity for DeployMicrok8sApplicationStep {
    const ID: &'static str = "deploy_microk8s_application";
}

impl StepDefinition for DeployMicrok8sApplicationStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Deploying MicroK8S"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.juju.application_exists(CONTROLLER_MODEL, MICROK8S_APPLICATION) {
            Ok(true) => return StepResult::skipped_because("microk8s already deployed"),
            Ok(false) => {}
            Err(e) => return failed("Error reading controller model status", e),
        }
        let vars = json!({ "model": CONTROLLER_MODEL, "machine_ids": [] });
        if let Err(e) = self.tf.apply(&vars) {
            return failed("Error deploying microk8s", e);
        }
        match self.juju.wait_application_ready(CONTROLLER_MODEL, MICROK8S_APPLICATION, self.timeout) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error waiting for microk8s", e),
        }
    }
}

/// Añade una unidad microk8s en la máquina de este nodo.
pub struct AddMicrok8sUnitStep {
    juju: Rc<dyn JujuController>,
    name: String,
}

impl AddMicrok8sUnitStep {
    pub fn new(juju: Rc<dyn JujuController>, name: &str) -> Self {
        Self { juju,
               name: name.to_string() }
    }
}

impl StepIdentity for AddMicrok8sUnitStep {
    const ID: &'static str = "add_microk8s_unit";
}

impl StepDefinition for AddMicrok8sUnitStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Add MicroK8S unit"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        let machine = match self.juju.machine_for_host(CONTROLLER_MODEL, &self.name) {
            Ok(Some(m)) => m,
            Ok(None) => return StepResult::failed(format!("No machine for {} in model {CONTROLLER_MODEL}", self.name)),
            Err(e) => return failed("Error reading controller model status", e),
        };
        match self.juju.unit_on_machine(CONTROLLER_MODEL, MICROK8S_APPLICATION, &machine) {
            Ok(Some(unit)) => return StepResult::skipped_because(format!("unit {unit} already on machine {machine}")),
            Ok(None) => {}
            Err(e) => return failed("Error reading controller model status", e),
        }
        match self.juju.add_unit(CONTROLLER_MODEL, MICROK8S_APPLICATION, &machine) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error adding microk8s unit", e),
        }
    }
}

/// Registra MicroK8S como cloud k8s en el controller.
pub struct AddMicrok8sCloudStep {
    juju: Rc<dyn JujuController>,
    controller: String,
}

impl AddMicrok8sCloudStep {
    pub fn new(juju: Rc<dyn JujuController>, controller: &str) -> Self {
        Self { juju,
               controller: controller.to_string() }
    }
}

impl StepIdentity for AddMicrok8sCloudStep {
    const ID: &'static str = "add_microk8s_cloud";
}

impl StepDefinition for AddMicrok8sCloudStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Add MicroK8S cloud to Juju controller"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        let cloud = StepPayload::Cloud { name: MICROK8S_CLOUD.to_string() };
        match self.juju.cloud_exists(MICROK8S_CLOUD) {
            Ok(true) => return StepResult::skipped_with(cloud),
            Ok(false) => {}
            Err(e) => return failed("Error listing Juju clouds", e),
        }
        let kubeconfig = match self.juju.kubeconfig(CONTROLLER_MODEL, MICROK8S_APPLICATION) {
            Ok(k) => k,
            Err(e) => return failed("Error reading microk8s kubeconfig", e),
        };
        match self.juju.add_k8s_cloud(MICROK8S_CLOUD, &self.controller, &kubeconfig) {
            Ok(()) => StepResult::completed_with(cloud),
            Err(e) => failed("Error adding microk8s cloud", e),
        }
    }
}
