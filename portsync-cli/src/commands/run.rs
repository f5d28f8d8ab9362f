//! `portsync run` — the long-running daemon.

use anyhow::{Context, Result};

use portsync_core::Settings;
use portsync_daemon::start_blocking;

pub fn run(settings: &Settings) -> Result<()> {
    start_blocking(settings).context("portsync exited with error")
}
