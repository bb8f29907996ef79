use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// TCP address of the device service, usually an `adb forward` port.
///
/// Endpoints are written as `tcp://host:port`; the scheme may be omitted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceEndpoint {
    host: String,
    port: u16,
}

impl DeviceEndpoint {
    /// Builds an endpoint from its parts.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

impl FromStr for DeviceEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let url = if trimmed.contains("://") {
            Url::parse(trimmed)?
        } else {
            Url::parse(&format!("tcp://{trimmed}"))?
        };
        if url.scheme() != "tcp" {
            return Err(EndpointParseError::UnsupportedScheme(
                url.scheme().to_owned(),
            ));
        }
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| EndpointParseError::MissingHost(input.to_owned()))?;
        let port = url
            .port()
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
        Ok(Self::tcp(host.trim_start_matches('[').trim_end_matches(']'), port))
    }
}

impl TryFrom<String> for DeviceEndpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceEndpoint> for String {
    fn from(endpoint: DeviceEndpoint) -> Self {
        endpoint.to_string()
    }
}

/// Errors encountered while parsing a [`DeviceEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not `tcp`.
    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// Port was missing from the address.
    #[error("missing port in '{0}'")]
    MissingPort(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
