use crate::error::{ReleaseTagError, Result};
use crate::git::command::{Subprocess, DEFAULT_TIMEOUT};
use crate::git::{branch_from_symbolic_ref, TreeStatus, VersionControl};
use git2::{Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Wrapper around git2::Repository with our trait interface
///
/// Reads go through libgit2. libgit2 cannot produce GPG signatures, so tag
/// creation is delegated to `git tag --sign`.
pub struct Git2Repository {
    repo: Git2Repo,
    timeout: Duration,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            ReleaseTagError::repository_state(format!("not in a git repository: {}", e.message()))
        })?;

        Ok(Git2Repository {
            repo,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound the signing subprocess by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn work_path(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }
}

const MODIFIED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE)
    .union(Status::WT_MODIFIED)
    .union(Status::WT_DELETED)
    .union(Status::WT_TYPECHANGE)
    .union(Status::WT_RENAMED)
    .union(Status::CONFLICTED);

impl VersionControl for Git2Repository {
    fn git_dir(&self) -> Result<PathBuf> {
        Ok(self.repo.path().to_path_buf())
    }

    fn work_tree(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseTagError::repository_state("repository has no working tree"))
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.find_reference("HEAD")?;

        match head.symbolic_target() {
            Some(target) => branch_from_symbolic_ref(target),
            None => Err(ReleaseTagError::repository_state(
                "HEAD is detached; check out a release branch first",
            )),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tree_status(&self) -> Result<TreeStatus> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            // Moved or dirty submodules count, as they do for `git diff`
            .exclude_submodules(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut status = TreeStatus::default();

        for entry in statuses.iter() {
            let path = entry.path().unwrap_or("(non-utf8 path)").to_string();
            let flags = entry.status();

            if flags.intersects(MODIFIED) {
                status.modified.push(path);
            } else if flags.contains(Status::WT_NEW) {
                status.untracked.push(path);
            }
        }

        status.modified.sort();
        status.untracked.sort();
        Ok(status)
    }

    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()> {
        Subprocess::git(self.work_path())
            .args(&["tag", "--sign", "--message", message, name])
            .timeout(self.timeout)
            .run_ok()?;
        Ok(())
    }
}
