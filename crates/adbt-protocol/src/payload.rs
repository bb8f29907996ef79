//! Typed request payloads carried in the envelope `data` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Commands addressed by name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommandName {
    /// JSON ping payload.
    Ping,
    /// Device model, manufacturer and OS details.
    GetDeviceInfo,
    /// Device wall-clock time.
    GetTime,
    /// Voice-test SDK initialisation check.
    VoiceInit,
    /// Whether a voice-test result is ready.
    VoiceCheckResult,
    /// Fetches the latest voice-test result.
    VoiceGetResult,
    /// Voice-test SDK status snapshot.
    VoiceGetStatus,
}

/// Marker serialised as the `command` field of a start-test request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartTestTag {
    /// The only accepted value, `voice_start_test`.
    #[default]
    VoiceStartTest,
}

/// Parameters for starting a voice test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTestRequest {
    /// Command marker.
    pub command: StartTestTag,
    /// Utterance the device should play.
    pub title: String,
    /// Sound zone the utterance targets.
    pub area: String,
}

impl StartTestRequest {
    /// Builds a start-test request for `title` in `area`.
    #[must_use]
    pub fn new(title: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            command: StartTestTag::VoiceStartTest,
            title: title.into(),
            area: area.into(),
        }
    }
}

/// Payload of an outgoing envelope, one variant per request shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestData {
    /// A command identified by its bare name.
    Command(CommandName),
    /// A voice test with its utterance and sound zone.
    StartTest(StartTestRequest),
    /// Operator-supplied JSON forwarded verbatim.
    Raw(Value),
}

impl From<CommandName> for RequestData {
    fn from(name: CommandName) -> Self {
        Self::Command(name)
    }
}

impl From<StartTestRequest> for RequestData {
    fn from(request: StartTestRequest) -> Self {
        Self::StartTest(request)
    }
}
