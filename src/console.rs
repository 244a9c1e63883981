//! Reporter de terminal: spinner mientras corre el step y banner al terminar.
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sunbeam_core::ProgressReporter;

#[derive(Default)]
pub struct ConsoleReporter {
    active: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&mut self, message: &str, banner: String) {
        if let Some(spinner) = self.active.take() {
            spinner.finish_and_clear();
        }
        println!("{message}{banner}");
    }
}

impl ProgressReporter for ConsoleReporter {
    fn announce(&mut self, message: &str) {
        if let Some(previous) = self.active.take() {
            previous.finish_and_clear();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
                                                          .unwrap_or_else(|_| ProgressStyle::default_spinner()));
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.active = Some(spinner);
    }

    fn succeed(&mut self, message: &str) {
        self.finish(message, "done".green().to_string());
    }

    fn skip(&mut self, message: &str) {
        self.finish(message, "skipping".green().to_string());
    }

    fn fail(&mut self, message: &str) {
        self.finish(message, "failed".red().to_string());
        println!();
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if let Some(spinner) = self.active.take() {
            spinner.finish_and_clear();
        }
    }
}
