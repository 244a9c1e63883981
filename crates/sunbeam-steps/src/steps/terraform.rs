use std::rc::Rc;

use sunbeam_core::{ExecutionContext, StepDefinition, StepResult};

use super::failed;
use crate::collaborators::TerraformApplier;

/// `terraform init` de un plan.
///
/// Un bootstrap inicializa más de un plan, así que la identidad incluye el
/// nombre del plan (`terraform_init_microk8s`, `terraform_init_openstack`).
pub struct TerraformInitStep {
    tf: Rc<dyn TerraformApplier>,
    id: String,
}

impl TerraformInitStep {
    pub fn new(tf: Rc<dyn TerraformApplier>) -> Self {
        let id = Self::id_for(tf.plan_name());
        Self { tf, id }
    }

    /// Identidad del step para un plan dado (`microk8s-plan` -> `terraform_init_microk8s`).
    pub fn id_for(plan_name: &str) -> String {
        let base = plan_name.strip_suffix("-plan").unwrap_or(plan_name);
        format!("terraform_init_{}", base.replace('-', "_"))
    }
}

impl StepDefinition for TerraformInitStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Initialize Terraform"
    }

    fn run(&self, _ctx: &ExecutionContext<'_>) -> StepResult {
        match self.tf.init() {
            Ok(()) => StepResult::completed(),
            Err(e) => failed(&format!("Error initializing terraform plan {}", self.tf.plan_name()), e),
        }
    }
}
