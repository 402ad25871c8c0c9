//! Release tagging workflow
//!
//! Kept free of clap and of process exit handling so it can run against any
//! [VersionControl] backend, including the in-memory mock.

use crate::domain::{MessageTemplate, ReleaseBranch, ReleaseTag, Version};
use crate::error::{ReleaseTagError, Result};
use crate::git::VersionControl;
use crate::release::{check_tree_is_clean, next_release, resolve_previous_release};

/// Settings for one run, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Project name substituted into the tag message
    pub project: String,

    /// Tag message template
    pub message_template: String,

    /// Branch used to select the release series instead of the checked-out one
    pub branch_override: Option<String>,

    /// Tag message used verbatim instead of the template
    pub message_override: Option<String>,

    /// Compute the tag but create nothing
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(project: impl Into<String>) -> Self {
        RunOptions {
            project: project.into(),
            message_template: MessageTemplate::default().template,
            branch_override: None,
            message_override: None,
            dry_run: false,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct TagOutcome {
    /// Branch the release series was selected from
    pub branch: String,

    /// Highest existing release of the series
    pub previous: Version,

    /// Version of the new tag
    pub next: Version,

    /// The tag that was (or would be) created
    pub tag: ReleaseTag,

    /// False under dry-run
    pub created: bool,
}

/// Drives one release against a repository
pub struct Orchestrator<'a, R: VersionControl + ?Sized> {
    repo: &'a R,
    options: RunOptions,
}

impl<'a, R: VersionControl + ?Sized> Orchestrator<'a, R> {
    pub fn new(repo: &'a R, options: RunOptions) -> Self {
        Orchestrator { repo, options }
    }

    /// Run the workflow:
    /// 1. Locate the git directory
    /// 2. Verify the tree is clean
    /// 3. Resolve the branch and its release series
    /// 4. Find the previous release and compute the next one
    /// 5. Create the signed tag (skipped under dry-run)
    ///
    /// The first failure aborts the run; nothing is written before step 5.
    pub fn run(&self) -> Result<TagOutcome> {
        let git_dir = self.repo.git_dir()?;
        tracing::info!(git_dir = %git_dir.display(), "using repository");

        check_tree_is_clean(self.repo)?;

        let branch_name = match &self.options.branch_override {
            Some(name) => {
                tracing::info!(branch = %name, "branch overridden on command line");
                name.clone()
            }
            None => self.repo.current_branch()?,
        };
        let branch = ReleaseBranch::parse(&branch_name)?;

        let tags = self.repo.list_tags()?;
        let previous = resolve_previous_release(&branch, &tags)?;
        let next = next_release(&previous, &branch)?;

        let tag = match &self.options.message_override {
            Some(message) => ReleaseTag::with_message(&next, message.clone()),
            None => ReleaseTag::new(
                &next,
                &self.options.project,
                &MessageTemplate::new(self.options.message_template.clone()),
            ),
        };

        if tags.iter().any(|t| *t == tag.name) {
            return Err(ReleaseTagError::TagExists(tag.name));
        }

        tracing::info!(
            branch = %branch,
            previous = %previous,
            next = %next,
            dry_run = self.options.dry_run,
            "computed release tag"
        );

        if !self.options.dry_run {
            self.repo.create_signed_tag(&tag.name, &tag.message)?;
        }

        Ok(TagOutcome {
            branch: branch_name,
            previous,
            next,
            tag,
            created: !self.options.dry_run,
        })
    }
}
