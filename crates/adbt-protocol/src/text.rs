//! Plain text frames.

use std::fmt;

/// Byte terminating every frame on the wire.
pub const FRAME_DELIMITER: u8 = b'\n';

/// Reply the device sends to a text `ping`.
pub const PONG: &str = "pong";

/// Text commands understood by the device service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextCommand {
    /// Liveness check answered with [`PONG`].
    Ping,
    /// Server status query.
    Status,
    /// Echo request; the device answers with the text verbatim.
    Echo(String),
}

impl fmt::Display for TextCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping => formatter.write_str("ping"),
            Self::Status => formatter.write_str("status"),
            Self::Echo(text) => write!(formatter, "echo {text}"),
        }
    }
}

/// Frames `message` for the wire by appending the delimiter.
#[must_use]
pub fn encode_text_frame(message: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(message.len() + 1);
    frame.extend_from_slice(message.as_bytes());
    frame.push(FRAME_DELIMITER);
    frame
}
