//! Version-control abstraction layer
//!
//! The release flow only needs a narrow slice of git: the current branch,
//! the tag list, tree cleanliness and signed tag creation. [VersionControl]
//! captures exactly that so the orchestration can run against:
//!
//! - [system::SystemGit]: shells out to the `git` CLI for everything
//! - [repository::Git2Repository]: reads through `git2`, signs through the CLI
//! - [mock::MockRepository]: in-memory state for tests
//!
//! ```rust
//! # use git_release_tag::git::VersionControl;
//! # fn example<R: VersionControl>(repo: &R) -> git_release_tag::Result<()> {
//! let branch = repo.current_branch()?;
//! let tags = repo.list_tags()?;
//! println!("{} has {} tags", branch, tags.len());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;
pub mod system;

pub use command::{CommandOutput, Subprocess};
pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use system::SystemGit;

use crate::error::{ReleaseTagError, Result};
use std::path::PathBuf;

/// Working-tree state relevant to the preflight check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatus {
    /// Tracked files with staged or unstaged modifications
    pub modified: Vec<String>,
    /// Untracked files not covered by ignore rules
    pub untracked: Vec<String>,
}

impl TreeStatus {
    /// No uncommitted modifications and no untracked files
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty()
    }
}

/// Strip `refs/heads/` from a symbolic HEAD target.
///
/// HEAD pointing anywhere else means there is no branch to release from.
pub fn branch_from_symbolic_ref(target: &str) -> Result<String> {
    match target.strip_prefix("refs/heads/") {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ReleaseTagError::repository_state(format!(
            "HEAD does not refer to any branch in refs/heads (points at '{}')",
            target
        ))),
    }
}

/// Git operations needed to cut a release
///
/// Implementations map their underlying failures onto
/// [crate::error::ReleaseTagError] variants; callers never see backend
/// specific error types.
pub trait VersionControl {
    /// Path of the repository's git directory
    ///
    /// Fails if the working directory is not inside a repository.
    fn git_dir(&self) -> Result<PathBuf>;

    /// Top-level directory of the working tree
    ///
    /// Fails for a bare repository.
    fn work_tree(&self) -> Result<PathBuf>;

    /// Name of the checked-out branch without the `refs/heads/` prefix
    ///
    /// # Returns
    /// * `Ok(String)` - e.g. "maint-1.2"
    /// * `Err(InvalidRepositoryState)` - HEAD is detached or not a local branch
    fn current_branch(&self) -> Result<String>;

    /// Names of all tags in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Modified and untracked files in the working tree
    fn tree_status(&self) -> Result<TreeStatus>;

    /// Convenience wrapper over [VersionControl::tree_status]
    fn is_tree_clean(&self) -> Result<bool> {
        Ok(self.tree_status()?.is_clean())
    }

    /// Create a signed annotated tag at HEAD
    ///
    /// Fails if signing fails (e.g. no key configured) or the tag exists.
    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()>;
}
