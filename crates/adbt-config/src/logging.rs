use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Formatter for the client's diagnostics on stderr.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, with event fields flattened, for
    /// capturing a session's transport trace to a file.
    Json,
    /// Terse lines interleaved with the operator's console output.
    #[default]
    Compact,
}

/// Returned when `--log-format` names an unknown formatter.
pub type LogFormatParseError = strum::ParseError;
