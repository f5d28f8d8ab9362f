//! Port-file → service reconciliation.
//!
//! The reconciler is the only owner of the "last applied port". It is updated
//! only after the service confirms a write, so a failed push is retried on the
//! next event even if the file content has not changed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use portsync_client::PortService;
use portsync_core::{read_port_file, PortFileError, PortFileRead, PortValue};

/// What a single reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No port file; nothing changed.
    FileMissing,
    /// Empty file. The service keeps whatever port was last applied.
    EmptyFile { kept: Option<PortValue> },
    /// Non-numeric or out-of-range content.
    Invalid,
    /// The file exists but could not be read.
    ReadFailed,
    /// Same as the last applied port; no request made.
    Unchanged(PortValue),
    /// Service already reports this port (startup only); no write made.
    AlreadyApplied(PortValue),
    Applied(PortValue),
    /// The service rejected the write; last applied port untouched.
    PushFailed(PortValue),
}

pub struct Reconciler {
    port_file: PathBuf,
    service: Arc<dyn PortService>,
    last_applied: Option<PortValue>,
}

impl Reconciler {
    pub fn new(port_file: impl Into<PathBuf>, service: Arc<dyn PortService>) -> Self {
        Self {
            port_file: port_file.into(),
            service,
            last_applied: None,
        }
    }

    pub fn port_file(&self) -> &Path {
        &self.port_file
    }

    pub fn last_applied(&self) -> Option<PortValue> {
        self.last_applied
    }

    /// Startup pass: adopt the file's port without writing when the service
    /// already reports it, otherwise fall through to [`reconcile`](Self::reconcile).
    pub fn startup(&mut self) -> ReconcileOutcome {
        let Ok(PortFileRead::Port(port)) = read_port_file(&self.port_file) else {
            return self.reconcile();
        };

        let reported = self
            .service
            .preferences()
            .and_then(|prefs| prefs.listening_port());
        if reported == Some(port) {
            tracing::info!(port = %port, "qBittorrent already uses the forwarded port");
            self.last_applied = Some(port);
            return ReconcileOutcome::AlreadyApplied(port);
        }

        self.reconcile()
    }

    /// Re-read the port file and push its value if it differs from the last
    /// applied port.
    pub fn reconcile(&mut self) -> ReconcileOutcome {
        let port = match read_port_file(&self.port_file) {
            Ok(PortFileRead::Port(port)) => port,
            Ok(PortFileRead::Missing) => {
                tracing::warn!(path = %self.port_file.display(), "port file does not exist");
                return ReconcileOutcome::FileMissing;
            }
            Ok(PortFileRead::Empty) => {
                // Never treat an empty read as "clear the port".
                match self.last_applied {
                    Some(kept) => tracing::warn!(
                        port = %kept,
                        "port file is empty; keeping previously applied port",
                    ),
                    None => tracing::warn!("port file is empty"),
                }
                return ReconcileOutcome::EmptyFile {
                    kept: self.last_applied,
                };
            }
            Err(PortFileError::Invalid { source, .. }) => {
                tracing::error!(error = %source, "invalid port number in port file");
                return ReconcileOutcome::Invalid;
            }
            Err(err) => {
                tracing::error!(error = %err, "error reading port file");
                return ReconcileOutcome::ReadFailed;
            }
        };

        if self.last_applied == Some(port) {
            tracing::debug!(port = %port, "port unchanged");
            return ReconcileOutcome::Unchanged(port);
        }

        tracing::info!(from = %LastPort(self.last_applied), to = %port, "port changed");
        if self.service.set_port(port) {
            self.last_applied = Some(port);
            ReconcileOutcome::Applied(port)
        } else {
            tracing::error!(port = %port, "failed to update qBittorrent port");
            ReconcileOutcome::PushFailed(port)
        }
    }
}

struct LastPort(Option<PortValue>);

impl fmt::Display for LastPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(port) => port.fmt(f),
            None => f.write_str("none"),
        }
    }
}
