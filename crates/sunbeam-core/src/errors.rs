//! Errores del motor de planes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    #[error("invalid role '{0}': expected one of control, compute, converged")]
    InvalidRole(String),
    #[error("no result recorded for step '{0}'")]
    StepResultMissing(String),
    /// Un step devolvió `Failed`. El plan se abortó en ese punto.
    #[error("{message}")]
    StepFailed { step: String, message: String },
    /// Un check de preflight no se cumplió.
    #[error("{message}")]
    CheckFailed { name: String, message: String },
    #[error("plan contains step '{0}' more than once")]
    DuplicateStep(String),
    /// Fallo inesperado de un colaborador (fuera del contrato Result/Check).
    #[error("collaborator error: {0}")]
    Collaborator(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl EngineError {
    /// `true` para los fallos esperados (check o step fallido) que se reportan
    /// al operador sin más detalle.
    pub fn is_expected_failure(&self) -> bool {
        matches!(self, EngineError::StepFailed { .. } | EngineError::CheckFailed { .. })
    }
}
