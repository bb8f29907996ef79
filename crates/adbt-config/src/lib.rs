//! Configuration for the ADB transport test client.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file (`--config-path` or `ADBT_CONFIG_PATH`), then `ADBT_*`
//! environment variables, then command-line flags.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod logging;
mod receive;

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, DEVICE_SERVICE_PORT,
    default_device_endpoint, default_log_filter, default_log_filter_string, default_log_format,
    default_receive_mode,
};
pub use endpoint::{DeviceEndpoint, EndpointParseError};
pub use logging::{LogFormat, LogFormatParseError};
pub use receive::{ReceiveMode, SINGLE_READ_LIMIT};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ADBT")]
pub struct Config {
    /// Where the device service (or its forward) listens.
    #[ortho_config(default = default_device_endpoint())]
    pub device_endpoint: DeviceEndpoint,
    /// How reply frames are read from the socket.
    #[ortho_config(default = default_receive_mode())]
    pub receive_mode: ReceiveMode,
    /// `tracing` filter directive for diagnostics on stderr.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Formatter used for diagnostics.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_endpoint: default_device_endpoint(),
            receive_mode: default_receive_mode(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint of the device service.
    #[must_use]
    pub fn device_endpoint(&self) -> &DeviceEndpoint {
        &self.device_endpoint
    }

    /// Reply framing strategy.
    #[must_use]
    pub const fn receive_mode(&self) -> ReceiveMode {
        self.receive_mode
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
