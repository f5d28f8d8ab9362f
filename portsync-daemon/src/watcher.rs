//! Port-file watcher.
//!
//! Renewal scripts often delete and recreate the port file, which drops a
//! watch placed on the file itself. The watcher therefore observes the parent
//! directory non-recursively and filters events down to the exact file path.

use std::fs;
use std::path::{Path, PathBuf};

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{io_err, DaemonError};

/// Capacity of the watcher → reconciler channel.
pub const SIGNAL_QUEUE_DEPTH: usize = 16;

/// The watched port file was created or modified. Carries no data: the
/// reconciler re-reads the file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortFileChanged;

/// Live OS-level watch. Dropping it stops event delivery and closes the
/// signal channel.
pub struct PortWatcher {
    _watcher: RecommendedWatcher,
    directory: PathBuf,
    target: PathBuf,
}

impl PortWatcher {
    /// Watch the parent directory of `port_file` and send one
    /// [`PortFileChanged`] per relevant event.
    ///
    /// # Errors
    /// Fails when the parent directory cannot be resolved or the OS watch
    /// cannot be established.
    pub fn start(
        port_file: &Path,
        signals: mpsc::Sender<PortFileChanged>,
    ) -> Result<Self, DaemonError> {
        let (directory, target) = resolve_watch_target(port_file)?;

        let filter_target = target.clone();
        let mut watcher = recommended_watcher(move |event: notify::Result<Event>| match event {
            Ok(event) => {
                if !is_port_file_event(&event, &filter_target) {
                    return;
                }
                tracing::trace!(kind = ?event.kind, "port file event");
                match signals.try_send(PortFileChanged) {
                    Ok(()) | Err(TrySendError::Closed(_)) => {}
                    // A full queue already guarantees a pending re-read.
                    Err(TrySendError::Full(_)) => {
                        tracing::trace!("reconcile already pending; dropping signal")
                    }
                }
            }
            Err(err) => tracing::warn!(error = %err, "port file watcher error"),
        })?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::info!(
            directory = %directory.display(),
            file = %target.display(),
            "watching port file directory",
        );

        Ok(Self {
            _watcher: watcher,
            directory,
            target,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Canonical path events are matched against.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Split `port_file` into (canonical parent directory, canonical file path).
///
/// Canonicalizing means event paths (which arrive as real paths) compare
/// equal to the target even when the configured path goes through a symlink.
pub(crate) fn resolve_watch_target(port_file: &Path) -> Result<(PathBuf, PathBuf), DaemonError> {
    let file_name = port_file
        .file_name()
        .ok_or_else(|| DaemonError::WatchTarget {
            path: port_file.to_path_buf(),
            reason: "path has no file name",
        })?;
    let parent = match port_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let directory = fs::canonicalize(&parent).map_err(|e| io_err(&parent, e))?;
    if !directory.is_dir() {
        return Err(DaemonError::WatchTarget {
            path: port_file.to_path_buf(),
            reason: "parent is not a directory",
        });
    }
    let target = directory.join(file_name);
    Ok((directory, target))
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

pub(crate) fn is_port_file_event(event: &Event, target: &Path) -> bool {
    is_relevant_event_kind(&event.kind)
        && event
            .paths
            .iter()
            .any(|path| path == target && !path.is_dir())
}
