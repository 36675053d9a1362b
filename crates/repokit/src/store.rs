//! Sidecar persistence for owner sets and permission tables.
//!
//! Two plain-text files live inside each repository root:
//!
//! - the owner file: one principal per line, whitespace-insignificant,
//!   blank lines skipped; a missing file means no owners yet;
//! - the permission file: a single `[permissions]` section of
//!   `principal = flags` entries; a missing file or section means an
//!   empty table.
//!
//! Both writers produce deterministic output (entries in lexicographic
//! order) and replace the file atomically: the new contents are written
//! to a temporary file in the repository directory and renamed into
//! place, so a crash mid-write never leaves a truncated sidecar.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::perms::PermSet;

/// Name of the section holding permission entries.
pub const PERMISSIONS_SECTION: &str = "permissions";

/// Read the owner sidecar. A missing file yields an empty set.
pub fn read_owners(path: &Path) -> Result<BTreeSet<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BTreeSet::new());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Write the owner sidecar: one principal per line, lexicographic order.
pub fn write_owners(path: &Path, owners: &BTreeSet<String>) -> Result<()> {
    let mut contents = String::new();
    for owner in owners {
        contents.push_str(owner);
        contents.push('\n');
    }
    atomic_write(path, &contents)
}

/// Read the permission sidecar.
///
/// A missing file or a file without a `[permissions]` section yields an
/// empty table. Sections other than `[permissions]` are ignored. Entries
/// with an empty flag string are skipped; entries with flags outside the
/// known alphabet fail with [`Error::InvalidPermissions`].
pub fn read_permissions(path: &Path) -> Result<BTreeMap<String, PermSet>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BTreeMap::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut entries = BTreeMap::new();
    let mut in_section = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            in_section = header.trim() == PERMISSIONS_SECTION;
            continue;
        }
        if !in_section {
            continue;
        }
        let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':'))
        else {
            return Err(Error::InvalidRepository(format!(
                "malformed permission entry on line {}: '{line}'",
                idx + 1
            )));
        };
        let flags: PermSet = value.trim().parse()?;
        if flags.is_empty() {
            continue;
        }
        entries.insert(key.trim().to_string(), flags);
    }

    Ok(entries)
}

/// Write the permission sidecar as a single `[permissions]` section with
/// entries in lexicographic order.
pub fn write_permissions(path: &Path, entries: &BTreeMap<String, PermSet>) -> Result<()> {
    let mut contents = format!("[{PERMISSIONS_SECTION}]\n");
    for (principal, flags) in entries {
        // writeln! to a String cannot fail
        let _ = writeln!(contents, "{principal} = {flags}");
    }
    atomic_write(path, &contents)
}

/// Write `contents` to a temporary file next to `path` and atomically
/// rename it into place.
fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "sidecar path has no parent directory",
        ))
    })?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}
