//! portsync — keep qBittorrent's listening port in sync with a VPN-forwarded
//! port file.
//!
//! # Usage
//!
//! ```text
//! portsync [run]      watch the port file and reconcile until interrupted
//! portsync check      print the service's and the file's port as JSON
//! ```
//!
//! Every setting can be given as a flag or through its environment variable
//! (`QB_HOST`, `QB_USERNAME`, `QB_PASSWORD`, `QB_DISABLE_AUTH`, `PORT_FILE`,
//! `LOG_LEVEL`, `LOG_FORMAT`, `CHECK_INTERVAL`, `QB_TIMEOUT`, `SETTLE_DELAY_MS`).

mod commands;
mod settings;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use settings::SettingsArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "portsync",
    version,
    about = "Sync qBittorrent's listening port with a VPN port-forwarding file",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Watch the port file and keep qBittorrent in sync (default).
    Run,

    /// Log in once, compare the service's port with the port file, print JSON.
    Check,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = parse_cli()?;
    let settings = cli.settings.into_settings()?;
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&settings),
        Commands::Check => commands::check::run(&settings),
    }
}

/// Parse arguments and environment. A bad setting value is a startup
/// failure (exit 1); help, version and usage errors keep clap's handling.
fn parse_cli() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(err) if is_invalid_setting(err.kind()) => {
            Err(err).context("invalid configuration")
        }
        Err(err) => err.exit(),
    }
}

fn is_invalid_setting(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::ValueValidation | ErrorKind::InvalidValue)
}
