//! Error types for the client runtime.

use std::io;
use std::sync::Arc;

use adbt_protocol::FrameError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Failures of a single exchange with the device.
///
/// None of these end a session on their own; the harness reports them and
/// carries on with the next step.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint host could not be resolved.
    #[error("failed to resolve device address {endpoint}: {source}")]
    Resolve {
        /// Endpoint as configured.
        endpoint: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// The TCP connection could not be opened.
    #[error("failed to connect to device at {endpoint}: {source}")]
    Connect {
        /// Endpoint as configured.
        endpoint: String,
        /// Socket error.
        #[source]
        source: io::Error,
    },
    /// An exchange was attempted without an open connection.
    #[error("not connected to the device")]
    NotConnected,
    /// The request could not be framed.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// Writing the request failed.
    #[error("failed to send request to device: {0}")]
    Send(#[source] io::Error),
    /// Reading the reply failed.
    #[error("failed to read reply from device: {0}")]
    Receive(#[source] io::Error),
    /// The device closed the stream instead of replying.
    #[error("device closed the connection")]
    ConnectionClosed,
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Connect(ClientError),
}
