//! Steps concretos del bootstrap, agrupados por colaborador.

pub mod clusterd;
pub mod juju;
pub mod microk8s;
pub mod openstack;
pub mod terraform;

use log::warn;
use sunbeam_core::StepResult;

use crate::errors::CollaboratorError;

pub use clusterd::{ClusterAddJujuUserStep, ClusterInitStep, ClusterUpdateJujuControllerStep};
pub use juju::{BackupBootstrapUserStep, BootstrapJujuStep, CreateJujuUserStep, RegisterJujuUserStep, SaveJujuUserLocallyStep};
pub use microk8s::{AddMicrok8sCloudStep, AddMicrok8sUnitStep, DeployMicrok8sApplicationStep};
pub use openstack::DeployControlPlaneStep;
pub use terraform::TerraformInitStep;

/// Convierte el error de un colaborador en un resultado `Failed` legible.
pub(crate) fn failed(context: &str, err: CollaboratorError) -> StepResult {
    warn!("{context}: {err}");
    StepResult::failed(format!("{context}: {err}"))
}
