//! Built-in commands operating on the access-control core.
//!
//! Each command is a plain function plus an entry in [`TABLE`], from
//! which the registry is built at startup. Handlers return
//! `anyhow::Result<()>`; the dispatcher sorts failures into usage
//! errors, expected domain errors and unexpected incidents.

use std::fs;

use anyhow::Result;
use repokit::{Error, Repository};

use crate::config::Config;
use crate::registry::{Command, Handler, Registry};
use crate::tools;

/// Invalid command arguments; the dispatcher answers with the command's
/// usage text.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// The static command table the registry is built from.
pub const TABLE: &[Command] = &[
    Command {
        name: "commands",
        usage: "usage: commands\n\nList every available command.",
        handler: Handler::Meta(list_commands),
    },
    Command {
        name: "help",
        usage: "usage: help\n\nShow a short introduction.",
        handler: Handler::Meta(help),
    },
    Command {
        name: "man",
        usage: "usage: man <command>\n\nShow a command's usage text.",
        handler: Handler::Meta(man),
    },
    Command {
        name: "init",
        usage: "usage: init <name>\n\n\
                Provision a new repository under the repository root, with\n\
                the calling principal as first owner, full permissions for\n\
                owners and wildcard read access.",
        handler: Handler::Repo(init),
    },
    Command {
        name: "owners",
        usage: "usage: owners <repository>\n\nList the repository's owners.",
        handler: Handler::Repo(owners),
    },
    Command {
        name: "add-owner",
        usage: "usage: add-owner <repository> <principal>\n\n\
                Add an owner. The new owner is also granted full (rw)\n\
                permissions.",
        handler: Handler::Repo(add_owner),
    },
    Command {
        name: "remove-owner",
        usage: "usage: remove-owner <repository> <principal>\n\n\
                Remove an owner. The last owner cannot be removed.",
        handler: Handler::Repo(remove_owner),
    },
    Command {
        name: "perms",
        usage: "usage: perms <repository>\n\n\
                List every stored permission entry, one 'principal = flags'\n\
                line each. The wildcard principal '*' holds the defaults.",
        handler: Handler::Repo(perms),
    },
    Command {
        name: "set-perms",
        usage: "usage: set-perms <repository> <principal> [flags]\n\n\
                Store the flag set (characters from 'rw') for a principal,\n\
                replacing any earlier entry. Omitting the flags removes the\n\
                entry.",
        handler: Handler::Repo(set_perms),
    },
    Command {
        name: "default-perms",
        usage: "usage: default-perms <repository>\n\n\
                Reset to the default policy: wildcard read for everyone,\n\
                full permissions for every owner.",
        handler: Handler::Repo(default_perms),
    },
    Command {
        name: "rename",
        usage: "usage: rename <repository> <new-name>\n\n\
                Move the repository directory to a sibling with the new\n\
                name.",
        handler: Handler::Repo(rename),
    },
    Command {
        name: "delete",
        usage: "usage: delete <repository>\n\n\
                Delete the whole repository directory. Cannot be undone.",
        handler: Handler::Repo(delete),
    },
];

fn usage(msg: impl Into<String>) -> anyhow::Error {
    UsageError(msg.into()).into()
}

/// Validate the name and open a handle under the configured root.
fn resolve(config: &Config, principal: &str, name: &str) -> Result<Repository> {
    if !tools::is_safe_name(name) {
        return Err(usage(format!("invalid repository name '{name}'")));
    }
    let repo = Repository::open(
        config.repository_root.join(name),
        principal,
        config.kind,
        &config.admin,
    )?;
    Ok(repo)
}

fn init(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a repository name"));
    };
    let name = tools::to_safe_name(name);
    if name.is_empty() {
        return Err(usage("repository name has no safe characters"));
    }
    let path = config.repository_root.join(&name);
    if path.exists() {
        return Err(Error::InvalidRepository(format!(
            "repository '{name}' already exists"
        ))
        .into());
    }

    // Markers only; running the actual VCS init is the transport
    // wrapper's job.
    for marker in config.kind.markers() {
        fs::create_dir_all(path.join(marker))?;
    }
    fs::write(path.join(config.kind.owner_file()), format!("{principal}\n"))?;

    let mut repo = Repository::open(&path, principal, config.kind, &config.admin)?;
    repo.set_default_permissions();
    repo.save()?;

    println!("initialized repository '{name}'");
    Ok(())
}

fn owners(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a repository name"));
    };
    let repo = resolve(config, principal, name)?;
    for owner in repo.owners() {
        println!("{owner}");
    }
    Ok(())
}

fn add_owner(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name, new_owner] = args else {
        return Err(usage("expected a repository name and a principal"));
    };
    let mut repo = resolve(config, principal, name)?;
    repo.add_owner(new_owner);
    repo.save()?;
    Ok(())
}

fn remove_owner(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name, owner] = args else {
        return Err(usage("expected a repository name and a principal"));
    };
    let mut repo = resolve(config, principal, name)?;
    repo.remove_owner(owner)?;
    repo.save()?;
    Ok(())
}

fn perms(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a repository name"));
    };
    let repo = resolve(config, principal, name)?;
    for (entry_principal, flags) in repo.all_permissions() {
        println!("{entry_principal} = {flags}");
    }
    Ok(())
}

fn set_perms(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let (name, target, flags) = match args {
        [name, target] => (name, target, ""),
        [name, target, flags] => (name, target, flags.as_str()),
        _ => {
            return Err(usage(
                "expected a repository name, a principal and optional flags",
            ));
        }
    };
    let mut repo = resolve(config, principal, name)?;
    repo.set_permissions(target, flags)?;
    repo.save()?;
    Ok(())
}

fn default_perms(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a repository name"));
    };
    let mut repo = resolve(config, principal, name)?;
    repo.set_default_permissions();
    repo.save()?;
    Ok(())
}

fn rename(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name, new_name] = args else {
        return Err(usage("expected a repository name and a new name"));
    };
    let new_name = tools::to_safe_name(new_name);
    if new_name.is_empty() {
        return Err(usage("new name has no safe characters"));
    }
    let mut repo = resolve(config, principal, name)?;
    repo.rename(&new_name)?;
    println!("renamed to '{}'", repo.name());
    Ok(())
}

fn delete(config: &Config, principal: &str, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a repository name"));
    };
    let repo = resolve(config, principal, name)?;
    repo.delete()?;
    Ok(())
}

fn list_commands(registry: &Registry, _args: &[String]) -> Result<()> {
    for name in registry.names() {
        println!("{name}");
    }
    Ok(())
}

fn help(_registry: &Registry, _args: &[String]) -> Result<()> {
    println!(
        "type 'commands' to list all available commands\n\
         type 'man <command>' to show a command's usage"
    );
    Ok(())
}

fn man(registry: &Registry, args: &[String]) -> Result<()> {
    let [name] = args else {
        return Err(usage("expected a command name"));
    };
    let Some(command) = registry.get(name) else {
        return Err(usage(format!("unknown command '{name}'")));
    };
    println!("{}", command.usage);
    Ok(())
}
