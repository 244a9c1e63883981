use crate::errors::EngineError;
use crate::registry::ResultRegistry;

use super::StepPayload;

/// Contexto que el executor entrega a cada step.
///
/// Sólo expone los resultados de los steps ya ejecutados en este mismo plan;
/// los steps posteriores aún no existen en el registro.
pub struct ExecutionContext<'a> {
    pub previous: &'a ResultRegistry,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(previous: &'a ResultRegistry) -> Self {
        Self { previous }
    }

    /// Payload de un step anterior del plan.
    pub fn payload(&self, step_id: &str) -> Result<&'a StepPayload, EngineError> {
        crate::registry::get_step_message(self.previous, step_id)
    }
}
