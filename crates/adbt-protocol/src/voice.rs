//! Typed views of voice-test reply data.
//!
//! Only the fields the client inspects are modelled; everything else the
//! device sends is ignored.

use serde_json::{Map, Value};

/// Reply data of `voice_check_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether a result is ready to fetch. Absent or non-boolean reads as
    /// `false`.
    pub has_result: bool,
    /// Device-reported test status.
    pub status: Option<String>,
}

impl CheckResult {
    /// Reads the check fields from reply data; missing data yields the
    /// "no result" default.
    #[must_use]
    pub fn from_data(data: Option<&Map<String, Value>>) -> Self {
        let Some(fields) = data else {
            return Self {
                has_result: false,
                status: None,
            };
        };
        Self {
            has_result: fields
                .get("hasResult")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            status: fields.get("status").map(value_text),
        }
    }
}

/// Reply data of `voice_get_result` once a result is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceResult {
    /// The recognised result.
    pub result: Value,
    /// Execution identifier of the test run.
    pub exe_id: Option<Value>,
    /// Device-reported status.
    pub status: Option<Value>,
}

impl VoiceResult {
    /// Extracts a result, or `None` when the data carries no `result` field.
    #[must_use]
    pub fn from_data(data: &Map<String, Value>) -> Option<Self> {
        let result = data.get("result")?.clone();
        Some(Self {
            result,
            exe_id: data.get("exeID").cloned(),
            status: data.get("status").cloned(),
        })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
