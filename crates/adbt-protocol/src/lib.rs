//! Wire types for the ADB transport test protocol.
//!
//! The device service speaks newline-delimited frames over a single TCP
//! stream. A frame is either a short text command (`ping`, `echo <text>`,
//! `status`) or a one-line JSON envelope `{type, id, data, timestamp}`. This
//! crate models both shapes, the typed request payloads sent inside the
//! envelope, and the interpretation of replies. It performs no IO.

mod envelope;
mod payload;
mod reply;
mod text;
mod voice;

pub use envelope::{Envelope, FrameError, generate_id, now_millis};
pub use payload::{CommandName, RequestData, StartTestRequest, StartTestTag};
pub use reply::{RAW_RESPONSE_KEY, Reply, ReplyKind};
pub use text::{FRAME_DELIMITER, PONG, TextCommand, encode_text_frame};
pub use voice::{CheckResult, VoiceResult};

/// Envelope `type` used for device commands.
pub const MSG_TYPE_COMMAND: &str = "command";
/// Envelope `type` used for JSON pings.
pub const MSG_TYPE_PING: &str = "ping";
/// Envelope `type` of a JSON ping reply.
pub const MSG_TYPE_PONG: &str = "pong";
/// Envelope `type` of a successful command reply.
pub const MSG_TYPE_RESPONSE: &str = "response";
/// Envelope `type` of an error reply.
pub const MSG_TYPE_ERROR: &str = "error";
/// Envelope `type` substituted when operator JSON omits one.
pub const MSG_TYPE_UNKNOWN: &str = "unknown";
