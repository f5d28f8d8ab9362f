//! Error types for portsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Why a piece of port-file text is not a usable port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortParseError {
    /// Nothing but whitespace.
    #[error("port file is empty")]
    Empty,

    /// Not a base-10 integer.
    #[error("invalid port number: {0:?}")]
    NotANumber(String),

    /// An integer, but not a TCP/UDP port.
    #[error("port {0} is outside the valid range 1-65535")]
    OutOfRange(i64),
}

/// Errors from reading the port file.
#[derive(Debug, Error)]
pub enum PortFileError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: PortParseError,
    },
}

/// Invalid configuration. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid host URL '{0}': expected an http:// or https:// URL")]
    InvalidHost(String),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("port file path '{}' has no file name", .0.display())]
    InvalidPortFile(PathBuf),

    #[error("unknown log level '{0}'; expected TRACE, DEBUG, INFO, WARNING, ERROR or CRITICAL")]
    UnknownLogLevel(String),

    #[error("unknown log format '{0}'; expected text or json")]
    UnknownLogFormat(String),

    #[error("invalid boolean '{0}'; expected true/false, yes/no, on/off or 1/0")]
    InvalidBool(String),
}
