//! Persistence integration tests
//!
//! Save/reload round trips through real sidecar files, plus byte-level
//! checks of the on-disk formats.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use repokit::{RepoKind, Repository};

const ADMIN: &str = "root";

fn git_repo(root: &Path, name: &str, owners: &[&str]) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(path.join(".git")).unwrap();
    if !owners.is_empty() {
        fs::write(
            path.join(RepoKind::Git.owner_file()),
            owners.join("\n") + "\n",
        )
        .unwrap();
    }
    path
}

#[test]
fn saved_state_survives_a_fresh_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["alice"]);

    {
        let mut repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
        repo.set_permissions("*", "r").unwrap();
        repo.set_permissions("bob", "w").unwrap();
        repo.save().unwrap();
    }

    let repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
    assert_eq!(repo.owners(), ["alice"]);
    assert!(repo.has_permissions("alice", "r").unwrap());
    assert!(repo.has_permissions("bob", "rw").unwrap());
    assert!(repo.has_permissions("eve", "r").unwrap());
    assert!(!repo.has_permissions("eve", "w").unwrap());
}

#[test]
fn unsaved_mutations_are_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["alice"]);

    {
        let mut repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
        repo.set_permissions("bob", "rw").unwrap();
        // dropped without save()
    }

    let repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
    assert!(!repo.has_permissions("bob", "r").unwrap());
}

#[test]
fn sidecar_files_have_the_documented_formats() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["alice"]);

    let mut repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
    repo.add_owner("bob");
    repo.set_permissions("*", "r").unwrap();
    repo.save().unwrap();

    let owners = fs::read_to_string(path.join(RepoKind::Git.owner_file())).unwrap();
    assert_eq!(owners, "alice\nbob\n");

    let perms = fs::read_to_string(path.join(RepoKind::Git.perm_file())).unwrap();
    assert_eq!(perms, "[permissions]\n* = r\nbob = rw\n");
}

#[test]
fn owner_writes_are_deterministically_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["mike"]);

    let mut repo = Repository::open(&path, "mike", RepoKind::Git, ADMIN).unwrap();
    repo.add_owner("zoe");
    repo.add_owner("alice");
    repo.save().unwrap();

    let owners = fs::read_to_string(path.join(RepoKind::Git.owner_file())).unwrap();
    assert_eq!(owners, "alice\nmike\nzoe\n");
}

#[test]
fn save_overwrites_stale_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["alice"]);

    {
        let mut repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
        repo.set_permissions("bob", "rw").unwrap();
        repo.set_permissions("carol", "r").unwrap();
        repo.save().unwrap();
    }
    {
        let mut repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
        repo.remove_all_permissions("carol");
        repo.save().unwrap();
    }

    let repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
    assert!(repo.permissions_of("carol").is_err());
    assert!(repo.has_permissions("bob", "rw").unwrap());
}

#[test]
fn hand_written_sidecars_with_loose_whitespace_load_fine() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &[]);
    fs::write(
        path.join(RepoKind::Git.owner_file()),
        "  alice \n\nbob\t\n",
    )
    .unwrap();
    fs::write(
        path.join(RepoKind::Git.perm_file()),
        "[permissions]\n  alice  =  wr \n",
    )
    .unwrap();

    let repo = Repository::open(&path, "bob", RepoKind::Git, ADMIN).unwrap();
    assert_eq!(repo.owners(), ["alice", "bob"]);
    assert_eq!(repo.permissions_of("alice").unwrap().to_string(), "rw");
}

#[test]
fn missing_permission_sidecar_loads_as_empty_and_is_created_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = git_repo(dir.path(), "project", &["alice"]);

    let repo = Repository::open(&path, "alice", RepoKind::Git, ADMIN).unwrap();
    assert_eq!(repo.all_permissions().count(), 0);

    repo.save().unwrap();
    let perms = fs::read_to_string(path.join(RepoKind::Git.perm_file())).unwrap();
    assert_eq!(perms, "[permissions]\n");
}
