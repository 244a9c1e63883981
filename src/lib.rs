//! Sunbeam: bootstrap del nodo local.
//!
//! Este crate une las piezas:
//! - `config`: configuración desde el entorno (.env incluido).
//! - `bootstrap`: checks de preflight y los cuatro planes del bootstrap.
//! - `console`: reporter interactivo para la terminal.
//! - `templates`: copia de los planes terraform a un directorio escribible.
//!
//! `main.rs` sólo parsea la CLI y llama a `bootstrap::bootstrap`.

pub mod bootstrap;
pub mod config;
pub mod console;
pub mod errors;
pub mod logging;
pub mod templates;

pub use bootstrap::{bootstrap, BootstrapContext, BootstrapReport};
pub use config::AppConfig;
pub use errors::BootstrapError;
