//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de trabajo de bootstrap con nombre estable. Este
//! módulo define:
//! - `StepDefinition`: interfaz neutral usada por el executor.
//! - `StepIdentity`: identidad estática por tipo de step (para lookups).
//! - `StepResult`, `ResultStatus` y `StepPayload`.
//! - `ExecutionContext`: vista de sólo lectura de los resultados previos.

mod context;
pub mod definition;
mod payload;
mod run_result;
mod status;

pub use context::ExecutionContext;
pub use definition::{StepDefinition, StepIdentity};
pub use payload::StepPayload;
pub use run_result::StepResult;
pub use status::ResultStatus;
