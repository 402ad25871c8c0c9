//! Pure formatting functions - no I/O, so every message shape is testable.

use crate::cli::orchestration::TagOutcome;

/// Severity tag for messages on the error stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Usage,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Usage => "usage error",
            Severity::Error => "error",
        }
    }
}

/// `<prog>: <severity>: <message>`
pub fn format_diagnostic(program: &str, severity: Severity, message: &str) -> String {
    format!("{}: {}: {}", program, severity.label(), message)
}

/// `<prog>: <message>`
pub fn format_info(program: &str, message: &str) -> String {
    format!("{}: {}", program, message)
}

/// Lines describing what a run did (or, under dry-run, would do)
pub fn format_outcome(outcome: &TagOutcome) -> Vec<String> {
    let verb = if outcome.created {
        "created signed tag"
    } else {
        "would create signed tag"
    };

    vec![
        format!("branch: {}", outcome.branch),
        format!("previous release: {}", outcome.previous.tag_name()),
        format!("{} {} ({:?})", verb, outcome.tag.name, outcome.tag.message),
    ]
}
