//! Contrato de reporte de progreso.
//!
//! El reporter sólo pinta: no decide nada sobre el flujo ni modifica los
//! resultados. Se pasa explícitamente al executor y a los checks.

/// Superficie de reporte de progreso.
pub trait ProgressReporter {
    /// Anuncia el inicio de un check o step. Queda "activo" hasta el próximo
    /// `succeed`/`skip`/`fail`.
    fn announce(&mut self, message: &str);
    fn succeed(&mut self, message: &str);
    fn fail(&mut self, message: &str);

    fn skip(&mut self, message: &str) {
        self.succeed(message);
    }
}

/// Reporter que descarta todo.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn announce(&mut self, _message: &str) {}
    fn succeed(&mut self, _message: &str) {}
    fn fail(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Announce(String),
    Succeed(String),
    Skip(String),
    Fail(String),
}

/// Reporter que guarda cada llamada en orden.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub lines: Vec<ReportLine>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announced(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                ReportLine::Announce(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                ReportLine::Fail(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn announce(&mut self, message: &str) {
        self.lines.push(ReportLine::Announce(message.to_string()));
    }

    fn succeed(&mut self, message: &str) {
        self.lines.push(ReportLine::Succeed(message.to_string()));
    }

    fn fail(&mut self, message: &str) {
        self.lines.push(ReportLine::Fail(message.to_string()));
    }

    fn skip(&mut self, message: &str) {
        self.lines.push(ReportLine::Skip(message.to_string()));
    }
}
