//! The repository handle.
//!
//! [`Repository`] composes path validation, the owner set and the
//! permission table around one repository directory. A handle is
//! request-scoped: the dispatcher opens it, queries or mutates it, calls
//! [`Repository::save`] and drops it. Nothing is cached across requests.
//!
//! Opening a handle enforces three things, in order: the path exists, the
//! kind's marker paths exist under it, and the requesting principal is an
//! owner or the administrative principal. The last check runs
//! unconditionally, so even operations that would only need wildcard read
//! access require owner-or-admin status; repositories are private to
//! non-owners regardless of granted flags.
//!
//! Concurrent requests against the same repository are not coordinated:
//! each handle holds independent in-memory copies and `save` is a blind
//! full overwrite, so the later save wins. Callers that mutate the same
//! repository from several processes must serialize externally.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::kind::RepoKind;
use crate::owners::OwnerSet;
use crate::perms::{PermSet, PermTable, WILDCARD};
use crate::store;

/// A validated, authorized handle on one repository.
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    kind: RepoKind,
    owners: OwnerSet,
    perms: PermTable,
}

impl Repository {
    /// Open a handle on the repository at `path`.
    ///
    /// Fails with [`Error::InvalidRepository`] if the path does not exist
    /// or lacks any marker of `kind`, and with
    /// [`Error::InvalidPermissions`] if `requester` is neither an owner
    /// nor the `admin` principal. Both sidecar files are loaded fresh.
    pub fn open(
        path: impl Into<PathBuf>,
        requester: &str,
        kind: RepoKind,
        admin: &str,
    ) -> Result<Self> {
        let path = path.into();
        let name = display_name(&path);

        if !path.exists() {
            return Err(Error::InvalidRepository(format!(
                "repository '{name}' does not exist"
            )));
        }
        for marker in kind.markers() {
            if !path.join(marker).exists() {
                return Err(Error::InvalidRepository(format!(
                    "'{name}' does not look like a {kind} repository"
                )));
            }
        }

        let owners = OwnerSet::from_members(store::read_owners(&path.join(kind.owner_file()))?);

        if requester != admin && !owners.contains(requester) {
            return Err(Error::InvalidPermissions(format!(
                "'{requester}' has no access to '{name}'"
            )));
        }

        let perms =
            PermTable::from_entries(store::read_permissions(&path.join(kind.perm_file()))?);

        Ok(Self {
            path,
            kind,
            owners,
            perms,
        })
    }

    /// Display name: the final segment of the repository path.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    /// The repository's current directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The repository's kind.
    pub fn kind(&self) -> RepoKind {
        self.kind
    }

    /// Add `principal` to the owner set and grant it full permissions.
    /// Idempotent on membership.
    pub fn add_owner(&mut self, principal: &str) {
        self.owners.add(principal);
        self.perms.set(principal, PermSet::FULL);
    }

    /// Remove `principal` from the owner set. Fails if it is the sole
    /// remaining owner. The principal's permission entry is left intact.
    pub fn remove_owner(&mut self, principal: &str) -> Result<()> {
        self.owners.remove(principal)
    }

    /// Owners in lexicographic order.
    pub fn owners(&self) -> Vec<&str> {
        self.owners.iter().collect()
    }

    /// Whether `principal` is an owner.
    pub fn is_owner(&self, principal: &str) -> bool {
        self.owners.contains(principal)
    }

    /// Reset to the default policy: wildcard read for everyone, full
    /// permissions for every current owner.
    pub fn set_default_permissions(&mut self) {
        self.perms.set(WILDCARD, PermSet::READ);
        let owners: Vec<String> = self.owners.iter().map(String::from).collect();
        for owner in owners {
            self.perms.set(&owner, PermSet::FULL);
        }
    }

    /// Validate that every character of `flags` is a known permission.
    pub fn assert_permissions(&self, flags: &str) -> Result<()> {
        flags.parse::<PermSet>().map(|_| ())
    }

    /// Store `flags` for `principal`, overwriting any prior entry. An
    /// empty flag string removes the entry instead.
    pub fn set_permissions(&mut self, principal: &str, flags: &str) -> Result<()> {
        let flags: PermSet = flags.parse()?;
        self.perms.set(principal, flags);
        Ok(())
    }

    /// All stored `(principal, flags)` pairs.
    pub fn all_permissions(&self) -> impl Iterator<Item = (&str, PermSet)> {
        self.perms.iter()
    }

    /// Whether `principal`'s effective permissions (wildcard entry merged
    /// with its personal entry) include every flag in `flags`. Missing
    /// entries contribute nothing; the check is fail-closed.
    pub fn has_permissions(&self, principal: &str, flags: &str) -> Result<bool> {
        let required: PermSet = flags.parse()?;
        Ok(self.perms.has(principal, required))
    }

    /// The flags stored for `principal`. Fails with
    /// [`Error::PermissionsNotFound`] if there is no entry; the wildcard
    /// entry is never substituted.
    pub fn permissions_of(&self, principal: &str) -> Result<PermSet> {
        self.perms
            .get(principal)
            .ok_or_else(|| Error::not_found(principal))
    }

    /// Remove the permission entry for `principal`, if any.
    pub fn remove_all_permissions(&mut self, principal: &str) {
        self.perms.remove(principal);
    }

    /// Persist both sidecar files. Each write is a full overwrite,
    /// replaced atomically via a temporary file in the repository
    /// directory.
    pub fn save(&self) -> Result<()> {
        store::write_permissions(&self.path.join(self.kind.perm_file()), self.perms.entries())?;
        store::write_owners(&self.path.join(self.kind.owner_file()), self.owners.members())?;
        Ok(())
    }

    /// Move the repository directory to a sibling path named
    /// `new_name` (after stripping surrounding whitespace and slashes)
    /// and update this handle's path. The move itself is not atomic with
    /// respect to a crash mid-operation.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        let name = new_name.trim_matches(|c: char| c.is_whitespace() || c == '/');
        if name.is_empty() {
            return Err(Error::InvalidRepository(
                "new repository name is empty".to_string(),
            ));
        }
        let parent = self.path.parent().ok_or_else(|| {
            Error::InvalidRepository(format!(
                "repository '{}' has no parent directory",
                self.name()
            ))
        })?;
        let new_path = parent.join(name);
        fs::rename(&self.path, &new_path)?;
        self.path = new_path;
        Ok(())
    }

    /// Recursively delete the entire repository directory, sidecars
    /// included. Irreversible; consumes the handle.
    pub fn delete(self) -> Result<()> {
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
