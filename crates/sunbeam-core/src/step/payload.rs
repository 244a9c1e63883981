use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload que un step deja para steps o planes posteriores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StepPayload {
    #[default]
    None,
    /// Token de corta duración (p.ej. registro de usuario Juju).
    Token(String),
    /// Secreto generado localmente.
    Secret(String),
    /// Cloud registrada en el controller.
    Cloud { name: String },
    Json(Value),
}

impl StepPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, StepPayload::None)
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            StepPayload::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_secret(&self) -> Option<&str> {
        match self {
            StepPayload::Secret(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            StepPayload::Json(v) => Some(v),
            _ => None,
        }
    }
}
