use crate::endpoint::DeviceEndpoint;
use crate::logging::LogFormat;
use crate::receive::ReceiveMode;

/// Host reached through `adb forward` on the workstation.
pub const DEFAULT_HOST: &str = "localhost";

/// Local port conventionally forwarded to the device service.
pub const DEFAULT_TCP_PORT: u16 = 8888;

/// Port the device service listens on behind the forward.
pub const DEVICE_SERVICE_PORT: u16 = 9999;

/// Default log filter expression. Operator output is not logging, so
/// diagnostics stay quiet unless asked for.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default reply framing strategy.
pub fn default_receive_mode() -> ReceiveMode {
    ReceiveMode::SingleRead
}

/// Endpoint used when nothing else is configured.
pub fn default_device_endpoint() -> DeviceEndpoint {
    DeviceEndpoint::tcp(DEFAULT_HOST, DEFAULT_TCP_PORT)
}
