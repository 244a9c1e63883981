use serde::{Deserialize, Serialize};

use super::{ResultStatus, StepPayload};

/// Resultado de ejecutar un step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub status: ResultStatus,
    pub payload: StepPayload,
    /// Obligatorio en `Failed`; opcional (motivo) en `Skipped`.
    pub message: Option<String>,
}

impl StepResult {
    pub fn completed() -> Self {
        Self { status: ResultStatus::Completed,
               payload: StepPayload::None,
               message: None }
    }

    pub fn completed_with(payload: StepPayload) -> Self {
        Self { status: ResultStatus::Completed,
               payload,
               message: None }
    }

    pub fn skipped() -> Self {
        Self { status: ResultStatus::Skipped,
               payload: StepPayload::None,
               message: None }
    }

    pub fn skipped_because(reason: impl Into<String>) -> Self {
        Self { status: ResultStatus::Skipped,
               payload: StepPayload::None,
               message: Some(reason.into()) }
    }

    /// Skipped pero conservando un payload ya existente (p.ej. la cloud que
    /// ya estaba registrada).
    pub fn skipped_with(payload: StepPayload) -> Self {
        Self { status: ResultStatus::Skipped,
               payload,
               message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { status: ResultStatus::Failed,
               payload: StepPayload::None,
               message: Some(message.into()) }
    }

    pub fn is_failed(&self) -> bool {
        self.status.is_failed()
    }

    /// Mensaje de fallo; si el step no dio uno se usa un texto genérico.
    pub fn failure_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| "step failed without message".to_string())
    }
}
