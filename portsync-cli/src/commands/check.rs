//! `portsync check` — one-shot comparison of service and file.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use portsync_client::{ClientConfig, PortService, QbitClient};
use portsync_core::{read_port_file, PortFileRead, Settings};
use portsync_daemon::init_tracing;

#[derive(Debug, Serialize)]
struct CheckReport {
    host: String,
    port_file: String,
    /// `None` when preferences could not be read.
    service_port: Option<i64>,
    file_port: Option<u16>,
    file_status: String,
    in_sync: bool,
}

pub fn run(settings: &Settings) -> Result<()> {
    init_tracing(settings.log_level, settings.log_format);

    let client = QbitClient::new(ClientConfig::from(settings));
    if !client.login() {
        bail!("could not log in to qBittorrent at {}", client.host());
    }

    let service_port = client.preferences().and_then(|prefs| prefs.listen_port);
    let (file_port, file_status) = match read_port_file(&settings.port_file) {
        Ok(PortFileRead::Port(port)) => (Some(port.get()), "ok".to_string()),
        Ok(PortFileRead::Missing) => (None, "missing".to_string()),
        Ok(PortFileRead::Empty) => (None, "empty".to_string()),
        Err(err) => (None, err.to_string()),
    };

    let report = CheckReport {
        host: client.host().to_string(),
        port_file: settings.port_file.display().to_string(),
        service_port,
        file_port,
        file_status,
        in_sync: file_port.is_some() && file_port.map(i64::from) == service_port,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render check report JSON")?
    );
    Ok(())
}
