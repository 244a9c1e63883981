//! Inicialización de logs.
//!
//! Los crates de librería usan `log`; aquí se instala un subscriber de
//! `tracing` que también recoge esos registros. `RUST_LOG` tiene prioridad
//! sobre los flags de la CLI.
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // ignora el error si ya había un subscriber global (tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter)
                                     .with_writer(std::io::stderr)
                                     .with_target(false)
                                     .try_init();
}
