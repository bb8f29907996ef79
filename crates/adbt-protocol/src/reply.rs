//! Interpretation of reply frames.
//!
//! The device normally answers an envelope with another envelope, but it is
//! free to send arbitrary text. A reply that is not a JSON object is kept as
//! raw text instead of being rejected, so callers always have something to
//! inspect.

use std::fmt;

use serde_json::{Map, Value};

use crate::{MSG_TYPE_ERROR, MSG_TYPE_PONG, MSG_TYPE_RESPONSE};

/// Key holding the original text in the mapping form of a raw reply.
pub const RAW_RESPONSE_KEY: &str = "raw_response";

/// A decoded reply frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The frame parsed as a JSON object.
    Json(Map<String, Value>),
    /// The frame was not a JSON object; the trimmed text is kept.
    Raw(String),
}

/// Classification of a reply by its envelope `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// `type == "response"`.
    Response,
    /// `type == "pong"`.
    Pong,
    /// `type == "error"`.
    Error,
    /// A JSON object with another or no `type`.
    Other,
    /// Raw text fallback.
    Raw,
}

impl Reply {
    /// Parses a reply frame, degrading to [`Reply::Raw`] on failure.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::Json(map),
            _ => Self::Raw(text.to_owned()),
        }
    }

    /// The envelope `type`, when present and a string.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        match self {
            Self::Json(map) => map.get("type").and_then(Value::as_str),
            Self::Raw(_) => None,
        }
    }

    /// Classifies the reply by its `type`.
    #[must_use]
    pub fn kind(&self) -> ReplyKind {
        match (self, self.message_type()) {
            (Self::Raw(_), _) => ReplyKind::Raw,
            (_, Some(MSG_TYPE_RESPONSE)) => ReplyKind::Response,
            (_, Some(MSG_TYPE_PONG)) => ReplyKind::Pong,
            (_, Some(MSG_TYPE_ERROR)) => ReplyKind::Error,
            _ => ReplyKind::Other,
        }
    }

    /// The envelope `data` field.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Json(map) => map.get("data"),
            Self::Raw(_) => None,
        }
    }

    /// The envelope `data` field when it is an object.
    #[must_use]
    pub fn data_object(&self) -> Option<&Map<String, Value>> {
        self.data().and_then(Value::as_object)
    }

    /// The original text of a raw reply.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Raw(text) => Some(text),
        }
    }

    /// Describes an `error` reply.
    ///
    /// The device reports errors either as a bare string or as an object
    /// with `error` and `category` fields.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if self.kind() != ReplyKind::Error {
            return None;
        }
        let message = match self.data() {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Object(fields)) => {
                let error = fields
                    .get("error")
                    .and_then(Value::as_str)
                    .map_or_else(|| Value::Object(fields.clone()).to_string(), str::to_owned);
                match fields.get("category").and_then(Value::as_str) {
                    Some(category) => format!("{error} ({category})"),
                    None => error,
                }
            }
            Some(other) => other.to_string(),
            None => String::from("unspecified error"),
        };
        Some(message)
    }

    /// Mapping view of the reply; raw text is wrapped under
    /// [`RAW_RESPONSE_KEY`].
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        match self {
            Self::Json(map) => map.clone(),
            Self::Raw(text) => {
                let mut map = Map::new();
                map.insert(RAW_RESPONSE_KEY.to_owned(), Value::String(text.clone()));
                map
            }
        }
    }

    /// Mapping view as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_mapping())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_value())
    }
}
