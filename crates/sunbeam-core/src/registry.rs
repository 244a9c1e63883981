//! Registro ordenado de resultados de un plan.
//!
//! Se crea vacío en cada `run_plan`, el executor es el único que inserta y al
//! terminar se entrega al llamador como valor de sólo lectura. Para pasar datos
//! a un plan posterior el llamador extrae el payload y lo inyecta en el
//! constructor del step que lo necesita.
use indexmap::IndexMap;

use crate::errors::EngineError;
use crate::step::{StepIdentity, StepPayload, StepResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRegistry {
    inner: IndexMap<String, StepResult>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, step_id: &str, result: StepResult) {
        self.inner.insert(step_id.to_string(), result);
    }

    pub fn get(&self, step_id: &str) -> Option<&StepResult> {
        self.inner.get(step_id)
    }

    pub fn contains(&self, step_id: &str) -> bool {
        self.inner.contains_key(step_id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Ids en orden de inserción (= orden del plan).
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepResult)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Payload del step `S`.
    pub fn payload_of<S: StepIdentity>(&self) -> Result<&StepPayload, EngineError> {
        get_step_message(self, S::ID)
    }
}

/// Devuelve el payload registrado para `step_id`.
///
/// Un id ausente es un error de composición del plan (el step no se incluyó),
/// no una condición recuperable.
pub fn get_step_message<'a>(registry: &'a ResultRegistry, step_id: &str) -> Result<&'a StepPayload, EngineError> {
    registry.get(step_id)
            .map(|r| &r.payload)
            .ok_or_else(|| EngineError::StepResultMissing(step_id.to_string()))
}
