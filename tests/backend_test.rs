// Both git backends against real temporary repositories.
//
// The CLI backend needs a `git` binary on PATH.

mod common;

use common::{commit_file, TestRepo};
use git_release_tag::cli::{Orchestrator, RunOptions};
use git_release_tag::git::{Git2Repository, SystemGit, VersionControl};
use git_release_tag::ReleaseTagError;

fn backends(repo: &TestRepo) -> Vec<(&'static str, Box<dyn VersionControl>)> {
    vec![
        (
            "cli",
            Box::new(SystemGit::new(repo.path())) as Box<dyn VersionControl>,
        ),
        (
            "git2",
            Box::new(Git2Repository::open(repo.path()).unwrap()) as Box<dyn VersionControl>,
        ),
    ]
}

#[test]
fn test_current_branch() {
    let repo = TestRepo::new("maint-1.2", &[]);
    for (name, vcs) in backends(&repo) {
        assert_eq!(vcs.current_branch().unwrap(), "maint-1.2", "backend {}", name);
    }
}

#[test]
fn test_detached_head() {
    let repo = TestRepo::new("maint", &[]);
    repo.detach_head();
    for (name, vcs) in backends(&repo) {
        let err = vcs.current_branch().unwrap_err();
        assert!(
            matches!(err, ReleaseTagError::InvalidRepositoryState(_)),
            "backend {}: {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_list_tags() {
    let repo = TestRepo::new("maint", &["v1.0.0", "v1.0.10", "v1.0.9", "not-a-release"]);
    for (name, vcs) in backends(&repo) {
        let mut tags = vcs.list_tags().unwrap();
        tags.sort();
        assert_eq!(
            tags,
            vec!["not-a-release", "v1.0.0", "v1.0.10", "v1.0.9"],
            "backend {}",
            name
        );
    }
}

#[test]
fn test_git_dir() {
    let repo = TestRepo::new("maint", &[]);
    let expected = repo.repo.path().canonicalize().unwrap();
    for (name, vcs) in backends(&repo) {
        let dir = vcs.git_dir().unwrap().canonicalize().unwrap();
        assert_eq!(dir, expected, "backend {}", name);
    }
}

#[test]
fn test_work_tree_from_subdirectory() {
    let repo = TestRepo::new("maint", &[]);
    let docs = repo.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    let expected = repo.path().canonicalize().unwrap();

    let vcs = vec![
        (
            "cli",
            Box::new(SystemGit::new(&docs)) as Box<dyn VersionControl>,
        ),
        (
            "git2",
            Box::new(Git2Repository::open(&docs).unwrap()) as Box<dyn VersionControl>,
        ),
    ];
    for (name, vcs) in vcs {
        let root = vcs.work_tree().unwrap().canonicalize().unwrap();
        assert_eq!(root, expected, "backend {}", name);
    }
}

#[test]
fn test_moved_submodule_counts_as_modified() {
    let library = TestRepo::new("maint", &[]);
    let repo = TestRepo::new("maint", &[]);
    let checkout = repo.add_submodule(&library, "lib");
    for (name, vcs) in backends(&repo) {
        assert!(vcs.is_tree_clean().unwrap(), "backend {}", name);
    }

    commit_file(&checkout, "CHANGES", "unreleased\n");
    for (name, vcs) in backends(&repo) {
        let status = vcs.tree_status().unwrap();
        assert_eq!(status.modified, vec!["lib"], "backend {}", name);
        assert!(status.untracked.is_empty(), "backend {}", name);
    }
}

#[test]
fn test_clean_tree() {
    let repo = TestRepo::new("maint", &[]);
    // Ignored files don't make the tree dirty
    repo.write("build.log", "noise\n");
    for (name, vcs) in backends(&repo) {
        assert!(vcs.is_tree_clean().unwrap(), "backend {}", name);
    }
}

#[test]
fn test_unstaged_modification() {
    let repo = TestRepo::new("maint", &[]);
    repo.write("README.md", "changed\n");
    for (name, vcs) in backends(&repo) {
        let status = vcs.tree_status().unwrap();
        assert_eq!(status.modified, vec!["README.md"], "backend {}", name);
        assert!(status.untracked.is_empty(), "backend {}", name);
    }
}

#[test]
fn test_staged_new_file() {
    let repo = TestRepo::new("maint", &[]);
    repo.write("NEWS", "release notes\n");
    repo.stage("NEWS");
    for (name, vcs) in backends(&repo) {
        let status = vcs.tree_status().unwrap();
        assert_eq!(status.modified, vec!["NEWS"], "backend {}", name);
    }
}

#[test]
fn test_untracked_file() {
    let repo = TestRepo::new("maint", &[]);
    repo.write("scratch.txt", "todo\n");
    for (name, vcs) in backends(&repo) {
        let status = vcs.tree_status().unwrap();
        assert!(status.modified.is_empty(), "backend {}", name);
        assert_eq!(status.untracked, vec!["scratch.txt"], "backend {}", name);
    }
}

#[test]
fn test_dirty_tree_blocks_release() {
    let repo = TestRepo::new("maint-1.2", &["v1.2.0"]);
    repo.write("scratch.txt", "todo\n");
    for (name, vcs) in backends(&repo) {
        let err = Orchestrator::new(vcs.as_ref(), RunOptions::new("Demo"))
            .run()
            .unwrap_err();
        assert!(
            matches!(err, ReleaseTagError::DirtyTree { .. }),
            "backend {}: {:?}",
            name,
            err
        );
    }
    assert_eq!(repo.tag_names(), vec!["v1.2.0"]);
}

#[test]
fn test_dry_run_against_real_repository() {
    let repo = TestRepo::new("maint-1.2", &["v1.2.3", "v1.2.9", "v1.2.10", "v1.3.0"]);
    for (name, vcs) in backends(&repo) {
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::new("Demo")
        };
        let outcome = Orchestrator::new(vcs.as_ref(), options).run().unwrap();
        assert_eq!(outcome.tag.name, "v1.2.11", "backend {}", name);
        assert!(!outcome.created);
    }
    assert_eq!(repo.tag_names().len(), 4);
}

#[test]
fn test_signing_failure_creates_nothing() {
    let repo = TestRepo::new("maint", &["v1.0.0"]);
    repo.break_gpg();
    for (name, vcs) in backends(&repo) {
        let err = vcs.create_signed_tag("v1.0.1", "Demo 1.0.1").unwrap_err();
        assert!(
            matches!(err, ReleaseTagError::ExternalCommand { .. }),
            "backend {}: {:?}",
            name,
            err
        );
    }
    assert_eq!(repo.tag_names(), vec!["v1.0.0"]);
}

#[cfg(unix)]
#[test]
fn test_creates_signed_annotated_tag() {
    let repo = TestRepo::new("maint-2.0", &["v2.0.0", "v2.0.1"]);
    repo.install_fake_gpg();

    let vcs = SystemGit::new(repo.path());
    let outcome = Orchestrator::new(&vcs, RunOptions::new("Demo")).run().unwrap();
    assert_eq!(outcome.tag.name, "v2.0.2");
    assert!(outcome.created);

    let reference = repo.repo.find_reference("refs/tags/v2.0.2").unwrap();
    let tag = reference.peel_to_tag().expect("tag should be annotated");
    let message = tag.message().unwrap();
    assert!(message.starts_with("Demo 2.0.2"));
    assert!(message.contains("BEGIN PGP SIGNATURE"));
    assert_eq!(tag.target_id(), repo.head);
}

#[cfg(unix)]
#[test]
fn test_git2_backend_signs_through_cli() {
    let repo = TestRepo::new("maint", &["v0.9.4"]);
    repo.install_fake_gpg();

    let vcs = Git2Repository::open(repo.path()).unwrap();
    let outcome = Orchestrator::new(&vcs, RunOptions::new("Demo")).run().unwrap();
    assert_eq!(outcome.tag.name, "v0.9.5");

    let tag = repo
        .repo
        .find_reference("refs/tags/v0.9.5")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert!(tag.message().unwrap().contains("BEGIN PGP SIGNATURE"));
}

#[test]
fn test_existing_tag_refused_by_git() {
    let repo = TestRepo::new("maint", &["v1.0.0"]);
    repo.break_gpg();
    // git checks for an existing tag before it tries to sign
    let err = SystemGit::new(repo.path())
        .create_signed_tag("v1.0.0", "again")
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
