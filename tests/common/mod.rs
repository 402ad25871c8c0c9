// Shared fixtures: temporary repositories built through git2
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway repository with one commit on `branch` and the given lightweight tags
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    pub head: Oid,
}

impl TestRepo {
    pub fn new(branch: &str, tags: &[&str]) -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        fs::write(dir.path().join("README.md"), "Initial content\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();

        let head = {
            let mut index = repo.index().unwrap();
            index.add_path(Path::new("README.md")).unwrap();
            index.add_path(Path::new(".gitignore")).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = Signature::now("Test User", "test@example.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
                .expect("Could not create commit")
        };

        {
            let commit = repo.find_commit(head).unwrap();
            // Whatever init.defaultBranch says, move HEAD to the branch under test
            if repo.find_branch(branch, git2::BranchType::Local).is_err() {
                repo.branch(branch, &commit, false).unwrap();
            }
            repo.set_head(&format!("refs/heads/{}", branch)).unwrap();
            for tag in tags {
                repo.tag_lightweight(tag, commit.as_object(), false)
                    .expect("Could not create tag");
            }
        }

        TestRepo { dir, repo, head }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn detach_head(&self) {
        self.repo.set_head_detached(self.head).unwrap();
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
    }

    pub fn stage(&self, name: &str) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    /// Ignore `pattern` through `.git/info/exclude` without touching the tree
    pub fn ignore_locally(&self, pattern: &str) {
        let info = self.repo.path().join("info");
        fs::create_dir_all(&info).unwrap();
        let exclude = info.join("exclude");
        let mut patterns = fs::read_to_string(&exclude).unwrap_or_default();
        patterns.push_str(pattern);
        patterns.push('\n');
        fs::write(exclude, patterns).unwrap();
    }

    /// Commit whatever is staged on top of HEAD
    pub fn commit_index(&self, message: &str) -> Oid {
        commit_staged(&self.repo, message)
    }

    /// Register `other` as a submodule at `path`, commit it and return its checkout
    pub fn add_submodule(&self, other: &TestRepo, path: &str) -> Repository {
        let url = other.path().to_str().unwrap();
        let mut submodule = self.repo.submodule(url, Path::new(path), true).unwrap();
        let checkout = submodule.clone(None).expect("Could not clone submodule");
        submodule.add_finalize().unwrap();
        self.commit_index("Add submodule");
        checkout
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.repo.config().unwrap().set_str(key, value).unwrap();
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.repo
            .tag_names(None)
            .unwrap()
            .iter()
            .flatten()
            .map(|s| s.to_string())
            .collect()
    }

    /// Point `gpg.program` at a stub that emits a well-formed fake signature
    #[cfg(unix)]
    pub fn install_fake_gpg(&self) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path().join(".fake-gpg.sh");
        fs::write(
            &script,
            "#!/bin/sh\n\
             cat >/dev/null\n\
             printf '\\n[GNUPG:] SIG_CREATED D 1 8 00 0 FAKE\\n' >&2\n\
             printf -- '-----BEGIN PGP SIGNATURE-----\\n\\nZmFrZQ==\\n-----END PGP SIGNATURE-----\\n'\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        // Keep the stub out of the untracked-file check
        let info = self.repo.path().join("info");
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("exclude"), ".fake-gpg.sh\n").unwrap();

        self.set_config("gpg.program", script.to_str().unwrap());
        self.set_config("user.signingkey", "FAKE");
    }

    /// Make every signing attempt fail
    pub fn break_gpg(&self) {
        self.set_config("gpg.program", "false");
        self.set_config("user.signingkey", "FAKE");
    }
}

/// Write `name` in `repo`'s work tree, stage it and commit on top of HEAD
pub fn commit_file(repo: &Repository, name: &str, content: &str) -> Oid {
    let workdir = repo.workdir().expect("repository has a work tree");
    fs::write(workdir.join(name), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    commit_staged(repo, &format!("Update {}", name))
}

fn commit_staged(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
        .expect("Could not create commit")
}
