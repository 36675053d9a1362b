//! Repokit - Repository access control for restricted remote shells
//!
//! Gates access to version-control repositories exposed through forced
//! SSH commands. Each repository directory carries two sidecar files: an
//! owner list and a permission table. Every operation against a
//! repository goes through a [`Repository`] handle, which validates the
//! directory, loads both sidecars, and enforces the owner-or-admin gate
//! before any query or mutation is possible.
//!
//! # Example
//!
//! ```rust
//! use repokit::{RepoKind, Repository};
//!
//! fn main() -> repokit::Result<()> {
//!     let dir = tempfile::tempdir()?;
//!     let path = dir.path().join("project");
//!     std::fs::create_dir_all(path.join(".git"))?;
//!     std::fs::write(path.join(RepoKind::Git.owner_file()), "alice\n")?;
//!
//!     let mut repo = Repository::open(&path, "alice", RepoKind::Git, "admin")?;
//!     repo.set_permissions("*", "r")?;
//!     repo.set_permissions("bob", "w")?;
//!     repo.save()?;
//!
//!     assert!(repo.has_permissions("bob", "rw")?);
//!     assert!(repo.has_permissions("eve", "r")?);
//!     assert!(!repo.has_permissions("eve", "w")?);
//!     Ok(())
//! }
//! ```
//!
//! Handles are request-scoped: open, query or mutate, [`Repository::save`],
//! drop. Saving is a full overwrite of both sidecars (each replaced
//! atomically); concurrent writers to the same repository are not
//! coordinated and must be serialized by the caller.

mod error;
mod kind;
mod owners;
mod perms;
mod repo;
mod store;

pub use error::{Error, Result};
pub use kind::RepoKind;
pub use perms::{PermSet, PermTable, WILDCARD};
pub use repo::Repository;
pub use store::PERMISSIONS_SECTION;
