use thiserror::Error;

/// Unified error type for git-release-tag operations
#[derive(Error, Debug)]
pub enum ReleaseTagError {
    #[error("{0}")]
    Usage(String),

    #[error("{reason}{}", format_paths(.paths))]
    DirtyTree { reason: String, paths: Vec<String> },

    #[error("{0}")]
    InvalidRepositoryState(String),

    #[error("current branch '{0}' is neither 'master' nor a maintenance branch")]
    InvalidBranch(String),

    #[error("TODO: implement {0}")]
    NotImplemented(String),

    #[error("tag '{0}' is ill-formed")]
    MalformedTag(String),

    #[error("no release tag found for series {0}")]
    NoPreviousRelease(String),

    #[error("tag '{0}' already exists")]
    TagExists(String),

    #[error("command `{command}` failed with exit code {code}: {stderr}")]
    ExternalCommand {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("command `{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release-tag
pub type Result<T> = std::result::Result<T, ReleaseTagError>;

/// How many offending paths a dirty-tree error lists before eliding the rest.
const MAX_LISTED_PATHS: usize = 10;

fn format_paths(paths: &[String]) -> String {
    if paths.is_empty() {
        return String::new();
    }

    let mut out = String::from(":");
    for path in paths.iter().take(MAX_LISTED_PATHS) {
        out.push_str("\n  ");
        out.push_str(path);
    }
    if paths.len() > MAX_LISTED_PATHS {
        out.push_str(&format!("\n  ... and {} more", paths.len() - MAX_LISTED_PATHS));
    }
    out
}

impl ReleaseTagError {
    /// Create a usage error with context
    pub fn usage(msg: impl Into<String>) -> Self {
        ReleaseTagError::Usage(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseTagError::Config(msg.into())
    }

    /// Create an invalid repository state error with context
    pub fn repository_state(msg: impl Into<String>) -> Self {
        ReleaseTagError::InvalidRepositoryState(msg.into())
    }

    /// Tree has staged or unstaged changes to tracked files
    pub fn uncommitted_changes(paths: Vec<String>) -> Self {
        ReleaseTagError::DirtyTree {
            reason: "tree contains uncommitted changes".to_string(),
            paths,
        }
    }

    /// Tree has untracked, non-ignored files
    pub fn untracked_files(paths: Vec<String>) -> Self {
        ReleaseTagError::DirtyTree {
            reason: "tree contains untracked files".to_string(),
            paths,
        }
    }

    /// Whether this error came from bad invocation rather than a runtime failure
    pub fn is_usage(&self) -> bool {
        matches!(self, ReleaseTagError::Usage(_))
    }
}
