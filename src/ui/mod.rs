//! User interface module - diagnostics and normal output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to stdout/stderr with optional colour

use console::style;

use crate::cli::orchestration::TagOutcome;

pub mod formatter;

pub use formatter::{format_diagnostic, format_info, format_outcome, Severity};

/// Writes messages prefixed with the program name.
///
/// The program name is fixed at construction; nothing here reads global state.
#[derive(Debug, Clone)]
pub struct Reporter {
    program: String,
}

impl Reporter {
    pub fn new(program: impl Into<String>) -> Self {
        Reporter {
            program: program.into(),
        }
    }

    /// Program name used as message prefix
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Normal message on stdout
    pub fn info(&self, message: &str) {
        println!("{}", format_info(&self.program, message));
    }

    /// Bad invocation, on stderr
    pub fn usage_error(&self, message: &str) {
        self.diagnostic(Severity::Usage, message);
    }

    /// Runtime failure, on stderr
    pub fn error(&self, message: &str) {
        self.diagnostic(Severity::Error, message);
    }

    /// Report the result of a run on stdout
    pub fn outcome(&self, outcome: &TagOutcome) {
        for line in format_outcome(outcome) {
            self.info(&line);
        }
    }

    fn diagnostic(&self, severity: Severity, message: &str) {
        let label = style(severity.label()).red().bold().for_stderr();
        eprintln!("{}: {}: {}", self.program, label, message);
    }
}
