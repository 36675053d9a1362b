//! repokit-shell - restricted command shell for repository access control
//!
//! Wired up as an SSH forced command, e.g. in authorized_keys:
//!
//! ```text
//! command="repokit-shell alice",no-pty,no-port-forwarding ssh-ed25519 AAAA...
//! ```
//!
//! The authenticated principal arrives as the only positional argument;
//! the command the user actually typed arrives in `SSH_ORIGINAL_COMMAND`
//! and is parsed into `(command, args)` before dispatch. For local
//! administration the command can also be given directly on the command
//! line after the principal.

mod commands;
mod config;
mod dispatch;
mod registry;
mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::registry::Registry;

/// Repokit shell - gate VCS commands behind per-repository permissions
#[derive(Parser, Debug)]
#[command(name = "repokit-shell")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "/etc/repokit/config.json")]
    config: PathBuf,

    /// Authenticated principal, as fixed by the forced-command line.
    principal: String,

    /// Command and arguments; read from SSH_ORIGINAL_COMMAND when absent.
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("REPOKIT_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(&args.config)?;
    let registry = Registry::from_config(&config);

    let (command, command_args) = match args.command.split_first() {
        Some((command, rest)) => (command.clone(), rest.to_vec()),
        None => {
            let raw = std::env::var("SSH_ORIGINAL_COMMAND").unwrap_or_default();
            tools::parse_forced_command(&raw)
                .unwrap_or_else(|| ("help".to_string(), Vec::new()))
        }
    };

    let status = dispatch::run(&config, &registry, &args.principal, &command, &command_args);
    std::process::exit(status);
}
