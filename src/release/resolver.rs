use crate::domain::{ReleaseBranch, Version};
use crate::error::{ReleaseTagError, Result};

/// Find the previous release of `branch`'s series among `tags`.
///
/// Only tags of the exact form `vX.Y.Z` take part; anything else in the tag
/// list is skipped. The highest version wins by numeric comparison, so
/// `v1.2.10` beats `v1.2.9`.
///
/// # Errors
/// * `NotImplemented` - `master` (major releases)
/// * `NoPreviousRelease` - no tag belongs to the series
pub fn resolve_previous_release(branch: &ReleaseBranch, tags: &[String]) -> Result<Version> {
    let series = match *branch {
        ReleaseBranch::Master => {
            return Err(ReleaseTagError::NotImplemented("major releases".to_string()))
        }
        ReleaseBranch::Maint => None,
        ReleaseBranch::MaintSeries { major, minor } => Some((major, minor)),
    };
    let in_series = |v: &Version| match series {
        Some((major, minor)) => v.in_series(major, minor),
        None => true,
    };

    let mut skipped = 0usize;
    let highest = tags
        .iter()
        .filter_map(|tag| match Version::from_tag(tag) {
            Ok(version) => Some(version),
            Err(_) => {
                skipped += 1;
                tracing::debug!(tag = %tag, "skipping non-release tag");
                None
            }
        })
        .filter(|v| in_series(v))
        .max();

    tracing::debug!(
        branch = %branch,
        total = tags.len(),
        skipped,
        previous = ?highest,
        "resolved previous release"
    );

    highest.ok_or_else(|| ReleaseTagError::NoPreviousRelease(branch.series()))
}

/// Compute the version that follows `previous` on `branch`.
///
/// Maintenance branches bump the micro component and keep major/minor.
pub fn next_release(previous: &Version, branch: &ReleaseBranch) -> Result<Version> {
    match branch {
        ReleaseBranch::Master => Err(ReleaseTagError::NotImplemented("major releases".to_string())),
        ReleaseBranch::Maint | ReleaseBranch::MaintSeries { .. } => previous.next_micro(),
    }
}
