//! Permission flags and the per-repository permission table.
//!
//! Permissions are drawn from a fixed two-flag alphabet: `r` (read/clone)
//! and `w` (write/push). A [`PermSet`] is a validated, deduplicated set of
//! those flags; a [`PermTable`] maps principals to flag sets and supplies
//! the merge semantics for the distinguished wildcard principal `*`.
//!
//! The key operation is the merge-then-subset check in [`PermTable::has`]:
//! the effective permissions of a principal are the union of the wildcard
//! entry and the principal's own entry (either may be absent and then
//! contributes nothing), and a request is authorized iff every requested
//! flag is in that union. The check is fail-closed and does not care which
//! entry supplied a flag.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The distinguished principal whose entry supplies default flags to every
/// principal without a personal entry.
pub const WILDCARD: &str = "*";

/// A deduplicated set of permission flags over the alphabet `{r, w}`.
///
/// Parsing accepts the flags in any order and with repetition
/// (`"wr"`, `"rrw"`), rejects anything outside the alphabet, and the
/// display form is canonical: `r` before `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermSet {
    read: bool,
    write: bool,
}

impl PermSet {
    /// No flags at all.
    pub const EMPTY: PermSet = PermSet {
        read: false,
        write: false,
    };

    /// Read-only access.
    pub const READ: PermSet = PermSet {
        read: true,
        write: false,
    };

    /// Full access, granted to owners.
    pub const FULL: PermSet = PermSet {
        read: true,
        write: true,
    };

    /// Whether the set grants read access.
    pub fn can_read(self) -> bool {
        self.read
    }

    /// Whether the set grants write access.
    pub fn can_write(self) -> bool {
        self.write
    }

    /// Whether the set grants nothing.
    pub fn is_empty(self) -> bool {
        !self.read && !self.write
    }

    /// Union of two flag sets.
    pub fn union(self, other: PermSet) -> PermSet {
        PermSet {
            read: self.read || other.read,
            write: self.write || other.write,
        }
    }

    /// Subset test: true iff every flag in `required` is present in `self`.
    pub fn contains(self, required: PermSet) -> bool {
        (!required.read || self.read) && (!required.write || self.write)
    }
}

impl FromStr for PermSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = PermSet::EMPTY;
        for c in s.chars() {
            match c {
                'r' => flags.read = true,
                'w' => flags.write = true,
                other => {
                    return Err(Error::InvalidPermissions(format!(
                        "unknown permission '{other}'"
                    )));
                }
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for PermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.read {
            f.write_str("r")?;
        }
        if self.write {
            f.write_str("w")?;
        }
        Ok(())
    }
}

/// Mapping from principal to flag set, with wildcard merge semantics.
///
/// At most one entry per principal. Empty flag sets are never stored:
/// setting an empty set removes the entry.
#[derive(Debug, Clone, Default)]
pub struct PermTable {
    entries: BTreeMap<String, PermSet>,
}

impl PermTable {
    /// Build a table from already-validated entries.
    pub fn from_entries(entries: BTreeMap<String, PermSet>) -> Self {
        Self { entries }
    }

    /// The stored entries, keyed and iterated in lexicographic order.
    pub fn entries(&self) -> &BTreeMap<String, PermSet> {
        &self.entries
    }

    /// Store `flags` for `principal`, overwriting any prior entry.
    /// An empty set removes the entry instead.
    pub fn set(&mut self, principal: &str, flags: PermSet) {
        if flags.is_empty() {
            self.entries.remove(principal);
        } else {
            self.entries.insert(principal.to_string(), flags);
        }
    }

    /// Remove the entry for `principal`. Returns whether one existed;
    /// removing an absent entry is not an error.
    pub fn remove(&mut self, principal: &str) -> bool {
        self.entries.remove(principal).is_some()
    }

    /// The flags stored for `principal`, if any. No wildcard substitution.
    pub fn get(&self, principal: &str) -> Option<PermSet> {
        self.entries.get(principal).copied()
    }

    /// Effective permissions: union of the wildcard entry and the
    /// principal's own entry. Absent entries contribute the empty set.
    pub fn effective(&self, principal: &str) -> PermSet {
        self.get(WILDCARD)
            .unwrap_or_default()
            .union(self.get(principal).unwrap_or_default())
    }

    /// Merge-then-subset check: true iff every flag in `required` is in
    /// the principal's effective permissions.
    pub fn has(&self, principal: &str, required: PermSet) -> bool {
        self.effective(principal).contains(required)
    }

    /// Iterate over `(principal, flags)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PermSet)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_accepts_any_order_and_repetition() {
        assert_eq!("rw".parse::<PermSet>().unwrap(), PermSet::FULL);
        assert_eq!("wr".parse::<PermSet>().unwrap(), PermSet::FULL);
        assert_eq!("rrw".parse::<PermSet>().unwrap(), PermSet::FULL);
        assert_eq!("r".parse::<PermSet>().unwrap(), PermSet::READ);
        assert_eq!("".parse::<PermSet>().unwrap(), PermSet::EMPTY);
    }

    #[test]
    fn parse_rejects_foreign_flags() {
        for bad in ["x", "rwx", "rx", " r", "R"] {
            let err = bad.parse::<PermSet>().unwrap_err();
            assert!(matches!(err, Error::InvalidPermissions(_)), "{bad:?}");
        }
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!("wr".parse::<PermSet>().unwrap().to_string(), "rw");
        assert_eq!(PermSet::READ.to_string(), "r");
        assert_eq!(PermSet::EMPTY.to_string(), "");
    }

    #[test]
    fn subset_check_is_fail_closed() {
        assert!(PermSet::FULL.contains(PermSet::READ));
        assert!(PermSet::FULL.contains(PermSet::EMPTY));
        assert!(!PermSet::READ.contains(PermSet::FULL));
        assert!(PermSet::EMPTY.contains(PermSet::EMPTY));
    }

    #[test]
    fn wildcard_and_personal_entries_merge() {
        let mut table = PermTable::default();
        table.set(WILDCARD, PermSet::READ);
        table.set("bob", "w".parse().unwrap());

        assert!(table.has("bob", PermSet::FULL));
        assert!(table.has("carol", PermSet::READ));
        assert!(!table.has("carol", "w".parse().unwrap()));
    }

    #[test]
    fn absent_entries_grant_nothing() {
        let table = PermTable::default();
        assert!(!table.has("anyone", PermSet::READ));
        assert!(table.has("anyone", PermSet::EMPTY));
        assert_eq!(table.get("anyone"), None);
    }

    #[test]
    fn setting_empty_flags_removes_the_entry() {
        let mut table = PermTable::default();
        table.set("bob", PermSet::FULL);
        assert_eq!(table.len(), 1);
        table.set("bob", PermSet::EMPTY);
        assert!(table.is_empty());
    }

    #[test]
    fn set_overwrites_prior_entry() {
        let mut table = PermTable::default();
        table.set("bob", PermSet::FULL);
        table.set("bob", PermSet::READ);
        assert_eq!(table.get("bob"), Some(PermSet::READ));
    }
}
