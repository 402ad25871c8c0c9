use crate::error::{ReleaseTagError, Result};
use crate::git::command::{Subprocess, DEFAULT_TIMEOUT};
use crate::git::{branch_from_symbolic_ref, TreeStatus, VersionControl};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend that drives the system `git` binary for every operation
pub struct SystemGit {
    repo_path: PathBuf,
    timeout: Duration,
}

impl SystemGit {
    /// Backend for the repository containing `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SystemGit {
            repo_path: path.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound every git invocation by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn git(&self, args: &[&str]) -> Subprocess {
        Subprocess::git(&self.repo_path)
            .args(args)
            .timeout(self.timeout)
    }
}

impl VersionControl for SystemGit {
    fn git_dir(&self) -> Result<PathBuf> {
        let output = self.git(&["rev-parse", "--git-dir"]).run_ok()?;
        let dir = PathBuf::from(output.first_line());

        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(self.repo_path.join(dir))
        }
    }

    fn work_tree(&self) -> Result<PathBuf> {
        let cmd = self.git(&["rev-parse", "--show-toplevel"]);
        let output = cmd.run_ok()?;

        match output.first_line() {
            "" => Err(ReleaseTagError::repository_state(
                "repository has no working tree",
            )),
            root => Ok(PathBuf::from(root)),
        }
    }

    fn current_branch(&self) -> Result<String> {
        let cmd = self.git(&["symbolic-ref", "-q", "HEAD"]);
        let output = cmd.run()?;

        match output.exit_code {
            0 => branch_from_symbolic_ref(output.first_line()),
            // -q: exit 1 without output when HEAD is not symbolic
            1 => Err(ReleaseTagError::repository_state(
                "HEAD is detached; check out a release branch first",
            )),
            code => Err(ReleaseTagError::ExternalCommand {
                command: cmd.display(),
                code,
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.git(&["tag", "--list"]).run_ok()?.lines())
    }

    fn tree_status(&self) -> Result<TreeStatus> {
        let unstaged = self
            .git(&["diff", "--no-ext-diff", "--name-only"])
            .run_ok()?
            .lines();
        let staged = self
            .git(&["diff-index", "--cached", "--name-only", "HEAD", "--"])
            .run_ok()?
            .lines();

        let modified: BTreeSet<String> = unstaged.into_iter().chain(staged).collect();

        let untracked = self
            .git(&["ls-files", "--others", "--exclude-standard"])
            .run_ok()?
            .lines();

        Ok(TreeStatus {
            modified: modified.into_iter().collect(),
            untracked,
        })
    }

    fn create_signed_tag(&self, name: &str, message: &str) -> Result<()> {
        self.git(&["tag", "--sign", "--message", message, name])
            .run_ok()?;
        Ok(())
    }
}
