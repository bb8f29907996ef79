//! The JSON envelope wrapping every structured request.
//!
//! An envelope serialises to a single line so it can share the newline
//! framing used by text commands. Identifiers are generated on the client
//! when the caller does not supply one, and the timestamp is stamped at
//! construction time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::payload::RequestData;
use crate::text::FRAME_DELIMITER;

/// Structured message exchanged with the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message category, for example `command` or `ping`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Client-generated token pairing a request with its reply.
    pub id: String,
    /// Command-specific payload.
    #[serde(default)]
    pub data: Value,
    /// Milliseconds since the Unix epoch when the envelope was built.
    pub timestamp: i64,
}

/// Errors raised while turning an envelope into a wire frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The payload could not be represented as JSON.
    #[error("failed to serialise envelope: {0}")]
    Serialise(#[from] serde_json::Error),
}

impl Envelope {
    /// Builds an envelope around an arbitrary JSON payload.
    ///
    /// A fresh identifier is generated when `id` is `None`.
    #[must_use]
    pub fn new(kind: impl Into<String>, data: Value, id: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.unwrap_or_else(generate_id),
            data,
            timestamp: now_millis(),
        }
    }

    /// Builds an envelope around a typed request payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Serialise`] when the payload cannot be converted
    /// into JSON.
    pub fn request(
        kind: impl Into<String>,
        data: &RequestData,
        id: Option<String>,
    ) -> Result<Self, FrameError> {
        let value = serde_json::to_value(data)?;
        Ok(Self::new(kind, value, id))
    }

    /// Serialises the envelope as one newline-terminated frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Serialise`] when serialisation fails.
    pub fn to_frame(&self) -> Result<Vec<u8>, FrameError> {
        let mut frame = serde_json::to_vec(self)?;
        frame.push(FRAME_DELIMITER);
        Ok(frame)
    }
}

/// Generates a unique envelope identifier.
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    let now = OffsetDateTime::now_utc();
    now.unix_timestamp() * 1000 + i64::from(now.millisecond())
}
