use std::path::PathBuf;

use thiserror::Error;

/// Startup and task-level failures. Anything returned from
/// [`run`](crate::run) ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("could not log in to qBittorrent at startup")]
    InitialLogin,

    #[error("cannot watch port file {path}: {reason}")]
    WatchTarget { path: PathBuf, reason: &'static str },

    #[error("{task} task failed: {source}")]
    Join {
        task: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
