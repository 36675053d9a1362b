//! Dispatcher configuration.
//!
//! A small JSON file names the repository root, the administrative
//! principal, the repository kind, and the incident-log directory. The
//! optional `enabled_commands` list narrows the command registry; meta
//! commands (`help`, `man`, `commands`) are always available.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use repokit::RepoKind;

/// Raw on-disk shape of the config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    repository_root: PathBuf,
    admin: String,
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default)]
    incident_dir: Option<PathBuf>,
    #[serde(default)]
    enabled_commands: Option<Vec<String>>,
}

fn default_kind() -> String {
    "git".to_string()
}

/// Resolved dispatcher configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which every repository lives, one subdirectory each.
    pub repository_root: PathBuf,
    /// The principal exempt from the owner-only handle gate.
    pub admin: String,
    /// Kind of every repository under the root.
    pub kind: RepoKind,
    /// Where per-incident failure reports are written.
    pub incident_dir: PathBuf,
    /// Optional allowlist narrowing the built-in command table.
    pub enabled_commands: Option<Vec<String>>,
}

impl Config {
    /// Load and resolve the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse a config from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text).context("malformed config file")?;
        let kind: RepoKind = file.kind.parse()?;
        let incident_dir = file
            .incident_dir
            .unwrap_or_else(|| file.repository_root.join("incidents"));
        Ok(Self {
            repository_root: file.repository_root,
            admin: file.admin,
            kind,
            incident_dir,
            enabled_commands: file.enabled_commands,
        })
    }
}
