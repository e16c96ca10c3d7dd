use std::time::Duration;

/// Port assigned to the dictionary protocol.
pub const DEFAULT_DICT_PORT: u16 = 2628;

/// Seconds allowed for establishing the control connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default log filter expression used by the binary.
///
/// Interactive sessions keep diagnostics quiet unless asked.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default port used by `open` when none is supplied.
pub fn default_port() -> u16 {
    DEFAULT_DICT_PORT
}

/// Default connect timeout in whole seconds.
pub fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Default connect timeout as a [`Duration`].
pub fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binary.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}
