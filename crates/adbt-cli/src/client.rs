//! The protocol client: one socket, one request in flight.
//!
//! Every exchange writes a newline-terminated frame and then blocks until a
//! reply frame has been read. How a reply frame is delimited depends on the
//! configured [`ReceiveMode`]: the default mirrors the device's historical
//! client and performs a single read of up to [`SINGLE_READ_LIMIT`] bytes,
//! while `line` mode keeps reading until the delimiter arrives.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use adbt_config::{DeviceEndpoint, ReceiveMode, SINGLE_READ_LIMIT};
use adbt_protocol::{Envelope, FRAME_DELIMITER, Reply, RequestData, encode_text_frame};
use tracing::{debug, info};

use crate::ClientError;
use crate::transport;

const TRANSPORT_TARGET: &str = "adbt::transport";

/// Owns the connection to the device service.
///
/// The socket is released by [`ProtocolClient::disconnect`] or when the
/// client is dropped.
#[derive(Debug)]
pub struct ProtocolClient {
    connection: Option<TcpStream>,
    receive_mode: ReceiveMode,
    pending: Vec<u8>,
}

impl ProtocolClient {
    /// Creates a disconnected client.
    #[must_use]
    pub const fn new(receive_mode: ReceiveMode) -> Self {
        Self {
            connection: None,
            receive_mode,
            pending: Vec::new(),
        }
    }

    /// Opens the connection, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Resolve`] or [`ClientError::Connect`] when the
    /// endpoint cannot be reached; the client is left disconnected.
    pub fn connect(&mut self, endpoint: &DeviceEndpoint) -> Result<(), ClientError> {
        self.disconnect();
        let stream = transport::connect(endpoint)?;
        info!(target: TRANSPORT_TARGET, %endpoint, "connected to device");
        self.connection = Some(stream);
        Ok(())
    }

    /// Whether a connection is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Closes the connection if one is open and reports whether it was.
    pub fn disconnect(&mut self) -> bool {
        self.pending.clear();
        let Some(stream) = self.connection.take() else {
            return false;
        };
        if let Err(error) = stream.shutdown(Shutdown::Both) {
            debug!(target: TRANSPORT_TARGET, %error, "socket shutdown reported an error");
        }
        info!(target: TRANSPORT_TARGET, "disconnected from device");
        true
    }

    /// Sends a text frame and returns the trimmed reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] before a successful connect, or
    /// an IO variant when the exchange fails.
    pub fn send_text(&mut self, message: &str) -> Result<String, ClientError> {
        self.exchange(&encode_text_frame(message))
    }

    /// Sends a JSON envelope and parses the reply.
    ///
    /// A fresh identifier is generated when `id` is `None`. Replies that are
    /// not JSON objects come back as [`Reply::Raw`] rather than as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] before a successful connect,
    /// [`ClientError::Frame`] when the payload cannot be serialised, or an IO
    /// variant when the exchange fails.
    pub fn send_json(
        &mut self,
        kind: &str,
        data: &RequestData,
        id: Option<String>,
    ) -> Result<Reply, ClientError> {
        let envelope = Envelope::request(kind, data, id)?;
        let text = self.exchange(&envelope.to_frame()?)?;
        Ok(Reply::parse(&text))
    }

    fn exchange(&mut self, frame: &[u8]) -> Result<String, ClientError> {
        let stream = self.connection.as_mut().ok_or(ClientError::NotConnected)?;
        debug!(
            target: TRANSPORT_TARGET,
            frame = %String::from_utf8_lossy(frame).trim_end(),
            "sending frame"
        );
        stream.write_all(frame).map_err(ClientError::Send)?;
        stream.flush().map_err(ClientError::Send)?;

        let reply = receive_frame(stream, self.receive_mode, &mut self.pending)?;
        debug!(target: TRANSPORT_TARGET, frame = %reply, "received frame");
        Ok(reply)
    }
}

impl Drop for ProtocolClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Reads one reply frame from `reader`.
///
/// `pending` carries bytes read past a delimiter in line mode; single-read
/// mode never uses it.
pub(crate) fn receive_frame<R>(
    reader: &mut R,
    mode: ReceiveMode,
    pending: &mut Vec<u8>,
) -> Result<String, ClientError>
where
    R: Read,
{
    let mut buffer = [0_u8; SINGLE_READ_LIMIT];
    match mode {
        ReceiveMode::SingleRead => {
            let read = read_retrying(reader, &mut buffer)?;
            if read == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            Ok(decode_frame(&buffer[..read]))
        }
        ReceiveMode::Line => loop {
            if let Some(position) = pending.iter().position(|byte| *byte == FRAME_DELIMITER) {
                let frame: Vec<u8> = pending.drain(..=position).collect();
                return Ok(decode_frame(&frame));
            }
            let read = read_retrying(reader, &mut buffer)?;
            if read == 0 {
                if pending.is_empty() {
                    return Err(ClientError::ConnectionClosed);
                }
                let frame = std::mem::take(pending);
                return Ok(decode_frame(&frame));
            }
            pending.extend_from_slice(&buffer[..read]);
        },
    }
}

fn read_retrying<R>(reader: &mut R, buffer: &mut [u8]) -> Result<usize, ClientError>
where
    R: Read,
{
    loop {
        match reader.read(buffer) {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            other => return other.map_err(ClientError::Receive),
        }
    }
}

fn decode_frame(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_owned()
}
