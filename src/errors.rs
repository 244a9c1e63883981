//! Errores de la aplicación.

use sunbeam_core::EngineError;
use sunbeam_steps::CollaboratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Check o step fallido, o error del motor.
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
