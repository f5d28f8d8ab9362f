//! Flag / environment surface for [`Settings`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args};

use portsync_core::config::{
    parse_bool, DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT_FILE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_USERNAME,
};
use portsync_core::{ConfigError, LogFormat, LogLevel, Settings};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// qBittorrent WebUI base URL.
    #[arg(long, env = "QB_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// WebUI username.
    #[arg(long, env = "QB_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// WebUI password.
    #[arg(
        long,
        env = "QB_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true,
        hide_default_value = true,
    )]
    pub password: String,

    /// Skip WebUI login (for instances with authentication disabled).
    #[arg(
        long = "disable-auth",
        env = "QB_DISABLE_AUTH",
        action = ArgAction::Set,
        default_value = "false",
        value_parser = parse_bool,
    )]
    pub auth_disabled: bool,

    /// File the VPN writes the forwarded port to.
    #[arg(long, env = "PORT_FILE", default_value = DEFAULT_PORT_FILE)]
    pub port_file: PathBuf,

    /// TRACE, DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: LogLevel,

    /// text or json.
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Seconds between liveness probes.
    #[arg(
        long,
        env = "CHECK_INTERVAL",
        default_value_t = DEFAULT_CHECK_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub check_interval: u64,

    /// Seconds before a WebUI request is abandoned.
    #[arg(
        long,
        env = "QB_TIMEOUT",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub timeout: u64,

    /// Milliseconds to wait after a file event before reading the file.
    #[arg(long, env = "SETTLE_DELAY_MS", default_value_t = DEFAULT_SETTLE_DELAY_MS)]
    pub settle_delay_ms: u64,
}

impl SettingsArgs {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let settings = Settings {
            host: self.host,
            username: self.username,
            password: self.password,
            auth_disabled: self.auth_disabled,
            port_file: self.port_file,
            log_level: self.log_level,
            log_format: self.log_format,
            check_interval: Duration::from_secs(self.check_interval),
            request_timeout: Duration::from_secs(self.timeout),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        };
        settings.validate()?;
        Ok(settings)
    }
}
