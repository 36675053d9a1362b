//! Command dispatch.
//!
//! Implements the collaborator contract around the core: take
//! `(principal, command, args)`, run the command, and turn the outcome
//! into a process exit status (0 success, 1 failure). Expected failures
//! (usage mistakes, domain errors from the core) become a single
//! user-visible line. Unexpected failures are shown in full to the
//! administrative principal only; everyone else gets a one-line
//! reference to a per-incident file written under the incident
//! directory, keyed by timestamp and principal.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info};

use crate::commands::UsageError;
use crate::config::Config;
use crate::registry::{Handler, Registry};

/// Run one command for `principal` and return the process exit status.
pub fn run(
    config: &Config,
    registry: &Registry,
    principal: &str,
    command: &str,
    args: &[String],
) -> i32 {
    info!(principal, command, ?args, "dispatch");

    let Some(entry) = registry.get(command) else {
        eprintln!("unknown command '{command}'");
        return 1;
    };

    let result = match entry.handler {
        Handler::Repo(handler) => handler(config, principal, args),
        Handler::Meta(handler) => handler(registry, args),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            report_failure(config, registry, principal, command, args, err);
            1
        }
    }
}

fn report_failure(
    config: &Config,
    registry: &Registry,
    principal: &str,
    command: &str,
    args: &[String],
    err: anyhow::Error,
) {
    if let Some(usage) = err.downcast_ref::<UsageError>() {
        eprintln!("invalid arguments: {usage}");
        if let Some(entry) = registry.get(command) {
            eprintln!("{}", entry.usage);
        }
        return;
    }

    if let Some(domain) = err.downcast_ref::<repokit::Error>() {
        eprintln!("{domain}");
        return;
    }

    // Unexpected failure. Full detail is admin-only.
    if principal == config.admin {
        eprintln!("system error: {err:?}");
        return;
    }

    let stamp = Utc::now().timestamp_millis();
    match write_incident(config, principal, command, args, &err, stamp) {
        Ok(path) => {
            error!(incident = %path.display(), "unexpected dispatch failure");
        }
        Err(io_err) => {
            error!(%io_err, "unexpected dispatch failure; incident file could not be written");
        }
    }
    eprintln!("system error ({stamp}), please report to the administrator");
}

fn write_incident(
    config: &Config,
    principal: &str,
    command: &str,
    args: &[String],
    err: &anyhow::Error,
    stamp: i64,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(&config.incident_dir)?;
    let path = config.incident_dir.join(format!("{stamp}-{principal}"));
    fs::write(&path, format!("{command} {args:?}\n{err:?}\n"))?;
    Ok(path)
}
