//! The per-repository owner set.
//!
//! Owners are the principals allowed to open a handle on a repository and
//! to run administrative operations against it. The one invariant: once a
//! repository has owners it must never end up with none, so removing the
//! sole remaining owner is rejected. Construction may legitimately start
//! empty (a freshly provisioned repository before its first owner is
//! assigned).

use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// An ordered set of owner principals, scoped to one repository.
#[derive(Debug, Clone, Default)]
pub struct OwnerSet {
    members: BTreeSet<String>,
}

impl OwnerSet {
    /// Build a set from existing members (e.g. a loaded sidecar file).
    pub fn from_members(members: impl IntoIterator<Item = String>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Add `principal`. Idempotent; returns whether the set changed.
    pub fn add(&mut self, principal: &str) -> bool {
        self.members.insert(principal.to_string())
    }

    /// Remove `principal`.
    ///
    /// Rejects removing the sole remaining owner. Removing a principal
    /// that is not a member is a no-op.
    pub fn remove(&mut self, principal: &str) -> Result<()> {
        if self.members.len() == 1 && self.contains(principal) {
            return Err(Error::InvalidPermissions(format!(
                "cannot remove last owner '{principal}'"
            )));
        }
        self.members.remove(principal);
        Ok(())
    }

    /// Membership test.
    pub fn contains(&self, principal: &str) -> bool {
        self.members.contains(principal)
    }

    /// Iterate members in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// The members as an ordered set, for persistence.
    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    /// Number of owners.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the repository has no owners yet.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut owners = OwnerSet::default();
        assert!(owners.add("alice"));
        assert!(!owners.add("alice"));
        assert_eq!(owners.len(), 1);
    }

    #[test]
    fn cannot_remove_last_owner() {
        let mut owners = OwnerSet::from_members(["alice".to_string()]);
        let err = owners.remove("alice").unwrap_err();
        assert!(matches!(err, Error::InvalidPermissions(_)));
        assert!(owners.contains("alice"));
    }

    #[test]
    fn remove_shrinks_by_one_when_others_remain() {
        let mut owners =
            OwnerSet::from_members(["alice".to_string(), "bob".to_string()]);
        owners.remove("bob").unwrap();
        assert_eq!(owners.len(), 1);
        assert!(owners.contains("alice"));
        assert!(!owners.contains("bob"));
    }

    #[test]
    fn remove_absent_member_is_a_noop() {
        let mut owners =
            OwnerSet::from_members(["alice".to_string(), "bob".to_string()]);
        owners.remove("carol").unwrap();
        assert_eq!(owners.len(), 2);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut owners = OwnerSet::default();
        owners.add("zoe");
        owners.add("alice");
        owners.add("bob");
        let names: Vec<&str> = owners.iter().collect();
        assert_eq!(names, ["alice", "bob", "zoe"]);
    }
}
