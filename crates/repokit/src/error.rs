//! Error types for the access-control core.
//!
//! Every failure a caller can observe falls into one of three categories:
//! an invalid repository (missing path or marker, corrupt sidecar), an
//! authorization or flag-validation failure, or a lookup miss on a
//! permission entry. The core never retries and never logs; all errors
//! propagate to the dispatching collaborator, which owns user-facing
//! formatting.

use thiserror::Error;

/// Result type alias using repokit's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Repokit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// The path is not a well-formed repository of the claimed kind, or a
    /// sidecar file is malformed. Raised at handle construction;
    /// unrecoverable for the request.
    #[error("invalid repository: {0}")]
    InvalidRepository(String),

    /// Authorization failure: a non-owner, non-admin principal opening a
    /// handle, an attempt to remove the last owner, or a permission string
    /// with a flag outside the known alphabet.
    #[error("invalid permissions: {0}")]
    InvalidPermissions(String),

    /// No permission entry is stored for the principal. Propagated rather
    /// than defaulted so the caller decides default policy explicitly.
    #[error("no permissions stored for '{principal}'")]
    PermissionsNotFound { principal: String },

    /// I/O error from sidecar or repository filesystem operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a [`Error::PermissionsNotFound`] for `principal`.
    pub(crate) fn not_found(principal: impl Into<String>) -> Self {
        Self::PermissionsNotFound {
            principal: principal.into(),
        }
    }
}
