//! Shared configuration for the `csdict` dictionary client.
//!
//! Settings are layered by `ortho_config`: built-in defaults, then an optional
//! configuration file (`--config-path`), then `CSDICT_*` environment variables,
//! then command-line flags. The interactive client only needs a handful of
//! knobs, namely the port `open` falls back to, how long a connect may take,
//! and how diagnostics are logged.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DICT_PORT, DEFAULT_LOG_FILTER, default_connect_timeout,
    default_connect_timeout_secs, default_log_filter, default_log_filter_string,
    default_log_format, default_port,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration for the dictionary client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CSDICT")]
pub struct Config {
    /// Port used by `open` when the command omits one.
    #[serde(default = "defaults::default_port")]
    pub default_port: u16,
    /// Seconds allowed for the TCP connect to complete.
    #[serde(default = "defaults::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// `tracing` filter expression applied to diagnostics on stderr.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Formatter used for diagnostics.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Port used by `open` when the command omits one.
    #[must_use]
    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    /// Connect timeout, clamped to at least one second.
    ///
    /// `TcpStream::connect_timeout` rejects a zero duration, so a configured
    /// zero is treated as one second.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Filter expression for diagnostics.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Formatter used for diagnostics.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
