use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use sunbeam_core::{ExecutionContext, StepDefinition, StepIdentity, StepPayload, StepResult};

use super::failed;
use crate::collaborators::{JujuController, TerraformApplier};
use crate::constants::{MICROK8S_CLOUD, OPENSTACK_DEPLOY_TIMEOUT_SECS, OPENSTACK_MODEL};
use crate::steps::microk8s::AddMicrok8sCloudStep;

/// Despliega el control plane de OpenStack sobre la cloud MicroK8S y espera a
/// que todo el modelo esté activo.
///
/// Siempre aplica: terraform decide si hay cambios.
pub struct DeployControlPlaneStep {
    tf: Rc<dyn TerraformApplier>,
    juju: Rc<dyn JujuController>,
    timeout: Duration,
}

impl DeployControlPlaneStep {
    pub fn new(tf: Rc<dyn TerraformApplier>, juju: Rc<dyn JujuController>) -> Self {
        Self { tf,
               juju,
               timeout: Duration::from_secs(OPENSTACK_DEPLOY_TIMEOUT_SECS) }
    }
}

impl StepIdentity for DeployControlPlaneStep {
    const ID: &'static str = "deploy_control_plane";
}

impl StepDefinition for DeployControlPlaneStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        "Deploying OpenStack Control Plane"
    }

    fn run(&self, ctx: &ExecutionContext<'_>) -> StepResult {
        // Si en este mismo plan se registró la cloud, usamos ese nombre
        let cloud = match ctx.payload(AddMicrok8sCloudStep::ID) {
            Ok(StepPayload::Cloud { name }) => name.clone(),
            _ => MICROK8S_CLOUD.to_string(),
        };
        let vars = json!({ "cloud": cloud, "model": OPENSTACK_MODEL });
        if let Err(e) = self.tf.apply(&vars) {
            return failed("Error deploying OpenStack control plane", e);
        }
        match self.juju.wait_model_ready(OPENSTACK_MODEL, self.timeout) {
            Ok(()) => StepResult::completed(),
            Err(e) => failed("Error waiting for OpenStack control plane", e),
        }
    }
}
