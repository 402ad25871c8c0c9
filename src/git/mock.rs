use crate::error::{ReleaseTagError, Result};
use crate::git::{TreeStatus, VersionControl};
use std::cell::RefCell;
use std::path::PathBuf;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    head: Option<String>,
    work_tree: PathBuf,
    tags: RefCell<Vec<String>>,
    status: TreeStatus,
    signing_failure: Option<String>,
    created: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a mock with HEAD on `branch` and no tags
    pub fn on_branch(branch: impl Into<String>) -> Self {
        MockRepository {
            head: Some(format!("refs/heads/{}", branch.into())),
            ..Self::default()
        }
    }

    /// Create a mock with a detached HEAD
    pub fn detached() -> Self {
        MockRepository {
            head: None,
            ..Self::default()
        }
    }

    /// Place the working tree at `path`
    pub fn with_work_tree(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_tree = path.into();
        self
    }

    /// Add an existing tag
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.tags.borrow_mut().push(name.into());
        self
    }

    /// Add several existing tags
    pub fn with_tags(self, names: &[&str]) -> Self {
        self.tags
            .borrow_mut()
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// Mark a tracked file as modified
    pub fn with_modified(mut self, path: impl Into<String>) -> Self {
        self.status.modified.push(path.into());
        self
    }

    /// Add an untracked file
    pub fn with_untracked(mut self, path: impl Into<String>) -> Self {
        self.status.untracked.push(path.into());
        self
    }

    /// Make signing fail with the given stderr
    pub fn with_signing_failure(mut self, stderr: impl Into<String>) -> Self {
        self.signing_failure = Some(stderr.into());
        self
    }

    /// Tags created through [VersionControl::create_signed_tag], as (name, message)
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.created.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        MockRepository {
            head: Some("refs/heads/maint".to_string()),
            work_tree: PathBuf::from("/work/waffle"),
            tags: RefCell::new(Vec::new()),
            status: TreeStatus::default(),
            signing_failure: None,
            created: RefCell::new(Vec::new()),
        }
    }
}

impl VersionControl for MockRepository {
    fn git_dir(&self) -> Result<PathBuf> {
        Ok(self.work_tree.join(".git"))
    }

    fn work_tree(&self) -> Result<PathBuf> {
        Ok(self.work_tree.clone())
    }

    fn current_branch(&self) -> Result<String> {
        match &self.head {
            Some(target) => crate::git::branch_from_symbolic_ref(target),
            None => Err(ReleaseTagError::repository_state("HEAD is detached")),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().clone())
    }

    fn tree_status(&self) -> Result<TreeStatus> {
        Ok(self.status.clone())
    }

    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()> {
        if let Some(stderr) = &self.signing_failure {
            return Err(ReleaseTagError::ExternalCommand {
                command: format!("git tag --sign --message {} {}", message, name),
                code: 128,
                stderr: stderr.clone(),
            });
        }

        if self.tags.borrow().iter().any(|t| t == name) {
            return Err(ReleaseTagError::TagExists(name.to_string()));
        }

        self.tags.borrow_mut().push(name.to_string());
        self.created
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }
}
