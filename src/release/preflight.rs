use crate::error::{ReleaseTagError, Result};
use crate::git::{TreeStatus, VersionControl};

/// Refuse to continue unless the working tree is clean.
///
/// Uncommitted changes (staged or not) are reported before untracked files.
pub fn check_tree_is_clean<R: VersionControl + ?Sized>(repo: &R) -> Result<TreeStatus> {
    let status = repo.tree_status()?;

    if !status.modified.is_empty() {
        return Err(ReleaseTagError::uncommitted_changes(status.modified));
    }
    if !status.untracked.is_empty() {
        return Err(ReleaseTagError::untracked_files(status.untracked));
    }

    tracing::debug!("working tree is clean");
    Ok(status)
}
