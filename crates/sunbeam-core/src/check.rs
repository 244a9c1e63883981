//! Checks de preflight.
//!
//! Un check inspecciona el entorno sin modificarlo. Un check que no se cumple
//! devuelve `CheckOutcome::Failed`; un `Err` queda reservado para condiciones
//! excepcionales y se propaga tal cual.
use log::debug;

use crate::errors::EngineError;
use crate::reporter::ProgressReporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed { message: String },
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

pub trait Check {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn run(&self) -> Result<CheckOutcome, EngineError>;
}

/// Ejecuta los checks en orden y se detiene en el primero que falla.
///
/// Debe llamarse antes de cualquier plan: un `Err` aquí implica que ningún
/// step mutante llegó a ejecutarse.
pub fn run_preflight_checks<R>(checks: &[Box<dyn Check>], reporter: &mut R) -> Result<(), EngineError>
    where R: ProgressReporter + ?Sized
{
    for check in checks {
        debug!("Starting pre-flight check {}", check.name());
        let line = format!("{} ... ", check.description());
        reporter.announce(&line);
        match check.run() {
            Ok(CheckOutcome::Passed) => reporter.succeed(&line),
            Ok(CheckOutcome::Failed { message }) => {
                reporter.fail(&line);
                return Err(EngineError::CheckFailed { name: check.name().to_string(),
                                                      message });
            }
            Err(e) => {
                reporter.fail(&line);
                return Err(e);
            }
        }
    }
    Ok(())
}
