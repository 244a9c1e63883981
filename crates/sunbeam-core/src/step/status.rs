use serde::{Deserialize, Serialize};

/// Estado final de un step.
///
/// `Completed` y `Skipped` dejan continuar el plan; `Failed` lo aborta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Completed,
    /// El trabajo ya estaba aplicado (steps idempotentes).
    Skipped,
    Failed,
}

impl ResultStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResultStatus::Failed)
    }
}
