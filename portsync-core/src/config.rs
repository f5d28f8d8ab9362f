//! Runtime settings and their defaults.
//!
//! Values normally come from the environment (see the `portsync` binary);
//! [`Settings::default`] mirrors the documented defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "http://localhost:8080";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "adminadmin";
pub const DEFAULT_PORT_FILE: &str = "/app/port.dat";
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

// ---------------------------------------------------------------------------
// Log level / format
// ---------------------------------------------------------------------------

/// Log verbosity. Accepts the usual level names plus `SUCCESS`, `WARNING`
/// and `CRITICAL`, case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Debug and trace output carries source locations.
    pub fn is_verbose(self) -> bool {
        matches!(self, LogLevel::Trace | LogLevel::Debug)
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" | "SUCCESS" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "CRITICAL" => Ok(LogLevel::Error),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::UnknownLogFormat(s.to_string())),
        }
    }
}

/// Parse an environment-style boolean (`1/0`, `true/false`, `yes/no`, `on/off`).
pub fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool(value.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything the daemon needs to start.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// WebUI base URL, e.g. `http://localhost:8080`.
    pub host: String,
    pub username: String,
    pub password: String,
    /// Skip the login request entirely (WebUI auth bypass deployments).
    pub auth_disabled: bool,
    pub port_file: PathBuf,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Period of the liveness probe.
    pub check_interval: Duration,
    /// Upper bound on every WebUI request.
    pub request_timeout: Duration,
    /// Pause between a file event and the read it triggers.
    pub settle_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            auth_disabled: false,
            port_file: PathBuf::from(DEFAULT_PORT_FILE),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
        }
    }
}

impl Settings {
    /// Host with any trailing `/` removed, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.host.trim_end_matches('/')
    }

    /// Reject settings the daemon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.base_url();
        let has_scheme = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_scheme {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "check interval",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "request timeout",
            });
        }
        if self.port_file.file_name().is_none() {
            return Err(ConfigError::InvalidPortFile(self.port_file.clone()));
        }
        Ok(())
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_disabled", &self.auth_disabled)
            .field("port_file", &self.port_file)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("check_interval", &self.check_interval)
            .field("request_timeout", &self.request_timeout)
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}
