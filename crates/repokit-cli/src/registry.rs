//! The command registry.
//!
//! Built exactly once at process startup from the static table in
//! [`crate::commands`], optionally narrowed by the config's
//! `enabled_commands` allowlist. There is no dynamic loading and no
//! registration-by-side-effect: what the table names is what exists.

use std::collections::BTreeMap;

use crate::commands;
use crate::config::Config;

/// Handler for commands that operate on a repository.
pub type RepoHandler = fn(&Config, &str, &[String]) -> anyhow::Result<()>;

/// Handler for commands that only need the registry itself
/// (`commands`, `help`, `man`).
pub type MetaHandler = fn(&Registry, &[String]) -> anyhow::Result<()>;

/// A command's handler, split by what it needs to run.
#[derive(Clone, Copy)]
pub enum Handler {
    Repo(RepoHandler),
    Meta(MetaHandler),
}

/// One registered command: name, usage text shown by `man`, handler.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub handler: Handler,
}

/// The set of commands available to this process.
pub struct Registry {
    pub(crate) commands: BTreeMap<&'static str, Command>,
}

impl Registry {
    /// The built-in set narrowed by the config's allowlist, if any.
    /// Meta commands are always kept so users can still discover what
    /// remains.
    pub fn from_config(config: &Config) -> Self {
        Self::filtered(config.enabled_commands.as_deref())
    }

    fn filtered(enabled: Option<&[String]>) -> Self {
        let mut commands = BTreeMap::new();
        for command in commands::TABLE {
            let keep = match (&command.handler, enabled) {
                (Handler::Meta(_), _) => true,
                (_, None) => true,
                (_, Some(list)) => list.iter().any(|name| name == command.name),
            };
            if keep {
                commands.insert(command.name, *command);
            }
        }
        Self { commands }
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Command names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use repokit::RepoKind;
    use std::path::PathBuf;

    fn config_with(enabled: Option<Vec<&str>>) -> Config {
        Config {
            repository_root: PathBuf::from("/srv/repos"),
            admin: "root".to_string(),
            kind: RepoKind::Git,
            incident_dir: PathBuf::from("/srv/repos/incidents"),
            enabled_commands: enabled
                .map(|list| list.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn full_registry_knows_the_admin_commands() {
        let registry = Registry::from_config(&config_with(None));
        for name in ["init", "owners", "set-perms", "rename", "delete", "man"] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn names_are_sorted() {
        let registry = Registry::from_config(&config_with(None));
        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn allowlist_narrows_repo_commands_but_keeps_meta() {
        let registry = Registry::from_config(&config_with(Some(vec!["owners"])));
        assert!(registry.get("owners").is_some());
        assert!(registry.get("delete").is_none());
        assert!(registry.get("help").is_some());
        assert!(registry.get("commands").is_some());
    }

    #[test]
    fn no_allowlist_means_everything() {
        let registry = Registry::from_config(&config_with(None));
        assert_eq!(registry.names().count(), commands::TABLE.len());
    }
}
