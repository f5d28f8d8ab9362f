//! portsync core library — domain types, port-file parsing, settings, errors.
//!
//! - [`types`] — [`PortValue`], [`SessionState`], [`Preferences`]
//! - [`port_file`] — one-shot reads of the forwarded-port file
//! - [`config`] — [`Settings`] and its defaults
//! - [`error`] — [`PortParseError`], [`PortFileError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod port_file;
pub mod types;

pub use config::{LogFormat, LogLevel, Settings};
pub use error::{ConfigError, PortFileError, PortParseError};
pub use port_file::{read_port_file, PortFileRead};
pub use types::{PortValue, Preferences, SessionState};
