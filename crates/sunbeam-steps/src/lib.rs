//! sunbeam-steps: steps y checks concretos del bootstrap.
//!
//! Este crate provee:
//! - Contratos de colaboradores externos (`ClusterService`, `JujuController`,
//!   `TerraformApplier`) y sus implementaciones (archivo local, binario
//!   `juju`, binario `terraform`), más variantes en memoria.
//! - Los steps de cada fase del bootstrap, todos idempotentes: si el trabajo
//!   ya está aplicado devuelven `Skipped`.
//! - `JujuSnapCheck` para el preflight.
//!
//! Nota: el core sólo ve estos steps como `StepDefinition`; los handles a
//! colaboradores viajan dentro de cada step (inyección por constructor).

pub mod account;
pub mod checks;
pub mod collaborators;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod steps;

pub use checks::JujuSnapCheck;
pub use collaborators::{ClusterService, JujuController, TerraformApplier};
pub use errors::CollaboratorError;
