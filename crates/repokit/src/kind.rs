//! Repository kinds and their on-disk fingerprints.
//!
//! Each supported version-control system is a variant of [`RepoKind`],
//! carrying its marker paths and sidecar filenames as plain data. A
//! candidate directory is a valid repository of a kind iff every marker
//! exists as a child of the directory. Dispatch on kind is a table
//! lookup; there is no per-kind behavior beyond this data.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The closed set of supported version-control kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoKind {
    Git,
    Hg,
    Svn,
}

/// Per-kind data: label, marker paths, sidecar filenames.
struct KindInfo {
    label: &'static str,
    markers: &'static [&'static str],
    owner_file: &'static str,
    perm_file: &'static str,
}

const GIT: KindInfo = KindInfo {
    label: "git",
    markers: &[".git"],
    owner_file: "repokit_owners",
    perm_file: "repokit_permissions",
};

const HG: KindInfo = KindInfo {
    label: "hg",
    markers: &[".hg"],
    owner_file: "repokit_owners",
    perm_file: "repokit_permissions",
};

const SVN: KindInfo = KindInfo {
    label: "svn",
    markers: &["conf", "db", "format"],
    owner_file: "repokit_owners",
    perm_file: "repokit_permissions",
};

impl RepoKind {
    /// All supported kinds.
    pub const ALL: [RepoKind; 3] = [RepoKind::Git, RepoKind::Hg, RepoKind::Svn];

    fn info(self) -> &'static KindInfo {
        match self {
            RepoKind::Git => &GIT,
            RepoKind::Hg => &HG,
            RepoKind::Svn => &SVN,
        }
    }

    /// Human-readable kind label, also the parse form.
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Filesystem entries that must exist under a directory for it to be
    /// a valid repository of this kind.
    pub fn markers(self) -> &'static [&'static str] {
        self.info().markers
    }

    /// Filename of the owner sidecar inside the repository root.
    pub fn owner_file(self) -> &'static str {
        self.info().owner_file
    }

    /// Filename of the permission sidecar inside the repository root.
    pub fn perm_file(self) -> &'static str {
        self.info().perm_file
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RepoKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        RepoKind::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| {
                Error::InvalidRepository(format!("unknown repository kind '{s}'"))
            })
    }
}
