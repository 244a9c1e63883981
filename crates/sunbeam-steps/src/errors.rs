//! Errores de colaboradores externos (cluster, juju, terraform).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("unexpected output: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(e: serde_json::Error) -> Self {
        CollaboratorError::Parse(e.to_string())
    }
}

impl From<CollaboratorError> for sunbeam_core::EngineError {
    fn from(e: CollaboratorError) -> Self {
        sunbeam_core::EngineError::Collaborator(e.to_string())
    }
}
