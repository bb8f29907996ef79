use std::io::{BufRead, Write};

use adbt_protocol::{MSG_TYPE_UNKNOWN, RequestData};
use serde_json::{Map, Value};

use super::voice::VOICE_CASES;
use crate::Interrupt;
use crate::harness::Harness;
use crate::input::is_stop_requested;

const PROMPT: &str = ">>> ";
const REPLY_MARKER: &str = "<<< ";

const HELP: &str = "\
Available commands:
  ping, status, echo <text>  plain text commands
  {\"type\": ...}              JSON envelope sent as typed
  voice_init                 initialise the voice-test SDK
  voice_test                 start the default voice test
  voice_check                check whether a result is ready
  voice_result               fetch the voice-test result
  voice_status               show the voice-test SDK status
  help                       show this message
  quit                       leave interactive mode";

/// One line of operator input, classified.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Input {
    Quit,
    Help,
    VoiceInit,
    VoiceTest,
    VoiceCheck,
    VoiceResult,
    VoiceStatus,
    Json(JsonRequest),
    InvalidJson(String),
    Text(String),
}

/// Envelope fields taken from an operator-typed JSON object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JsonRequest {
    pub(crate) kind: String,
    pub(crate) data: Value,
    pub(crate) id: Option<String>,
}

impl JsonRequest {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            kind: object
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(MSG_TYPE_UNKNOWN)
                .to_owned(),
            data: object.get("data").cloned().unwrap_or(Value::Null),
            id: object.get("id").and_then(Value::as_str).map(str::to_owned),
        }
    }
}

impl Input {
    /// Classifies a trimmed line. Keywords match case-insensitively.
    pub(crate) fn parse(line: &str) -> Self {
        match line.to_lowercase().as_str() {
            "quit" => return Self::Quit,
            "help" => return Self::Help,
            "voice_init" => return Self::VoiceInit,
            "voice_test" => return Self::VoiceTest,
            "voice_check" => return Self::VoiceCheck,
            "voice_result" => return Self::VoiceResult,
            "voice_status" => return Self::VoiceStatus,
            _ => {}
        }
        if line.starts_with('{') && line.ends_with('}') {
            return match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(object)) => Self::Json(JsonRequest::from_object(&object)),
                Ok(_) => Self::InvalidJson(String::from("expected a JSON object")),
                Err(error) => Self::InvalidJson(error.to_string()),
            };
        }
        Self::Text(line.to_owned())
    }
}

/// Reads operator lines until `quit`, end of input or an interrupt.
pub(crate) fn run_interactive<R, W>(harness: &mut Harness<'_, W>, input: &mut R, interrupt: &Interrupt)
where
    R: BufRead,
    W: Write,
{
    harness.console().blank();
    harness.console().line("=== Interactive mode ===");
    harness.console().line("Type 'help' for commands, 'quit' to leave");

    let mut line = String::new();
    loop {
        if interrupt.is_requested() {
            report_interrupt(harness);
            break;
        }
        harness.console().prompt(PROMPT);
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                harness.console().blank();
                break;
            }
            Ok(_) => {}
            Err(error) if is_stop_requested(&error) || interrupt.is_requested() => {
                report_interrupt(harness);
                break;
            }
            Err(error) => {
                harness.console().failure(format_args!("failed to read input: {error}"));
                break;
            }
        }
        if !dispatch(harness, Input::parse(line.trim())) {
            break;
        }
    }
}

fn report_interrupt<W: Write>(harness: &mut Harness<'_, W>) {
    harness.console().blank();
    harness.console().line("Interrupted");
}

/// Handles one input. Returns `false` when the loop should end.
fn dispatch<W: Write>(harness: &mut Harness<'_, W>, input: Input) -> bool {
    match input {
        Input::Quit => return false,
        Input::Help => harness.console().line(HELP),
        Input::VoiceInit => {
            harness.voice_init();
        }
        Input::VoiceTest => {
            let (title, area) = VOICE_CASES[0];
            harness.voice_start_test(title, area);
        }
        Input::VoiceCheck => {
            harness.voice_check_result();
        }
        Input::VoiceResult => {
            harness.voice_get_result();
        }
        Input::VoiceStatus => {
            harness.voice_get_status();
        }
        Input::Json(request) => send_json(harness, request),
        Input::InvalidJson(error) => harness.console().failure(format_args!("invalid JSON: {error}")),
        Input::Text(text) => match harness.client().send_text(&text) {
            Ok(reply) => harness.console().line(format_args!("{REPLY_MARKER}{reply}")),
            Err(error) => harness.console().failure(format_args!("error: {error}")),
        },
    }
    true
}

fn send_json<W: Write>(harness: &mut Harness<'_, W>, request: JsonRequest) {
    let data = RequestData::Raw(request.data);
    match harness.client().send_json(&request.kind, &data, request.id) {
        Ok(reply) => {
            let value = reply.to_value();
            let rendered = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            harness.console().line(format_args!("{REPLY_MARKER}{rendered}"));
        }
        Err(error) => harness.console().failure(format_args!("error: {error}")),
    }
}
