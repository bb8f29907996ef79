//! Named device checks.
//!
//! Each method sends one request, judges the reply against what the device
//! is expected to answer, narrates the outcome on the console and returns a
//! simplified result. Failures never propagate: a failed check is reported
//! and the caller moves on.

use std::io::Write;

use adbt_protocol::{
    CheckResult, CommandName, MSG_TYPE_COMMAND, MSG_TYPE_PING, PONG, Reply, ReplyKind,
    RequestData, StartTestRequest, TextCommand, VoiceResult,
};
use serde_json::{Map, Value};

use crate::ClientError;
use crate::client::ProtocolClient;
use crate::console::{Console, render_optional, render_value};

/// Couples the client with the operator's console.
pub(crate) struct Harness<'a, W: Write> {
    client: &'a mut ProtocolClient,
    console: Console<W>,
}

impl<'a, W: Write> Harness<'a, W> {
    pub(crate) const fn new(client: &'a mut ProtocolClient, out: W) -> Self {
        Self {
            client,
            console: Console::new(out),
        }
    }

    pub(crate) fn console(&mut self) -> &mut Console<W> {
        &mut self.console
    }

    pub(crate) fn client(&mut self) -> &mut ProtocolClient {
        self.client
    }

    /// Text ping; succeeds when the device answers `pong`.
    pub(crate) fn ping(&mut self) -> bool {
        self.console.sending("ping");
        match self.client.send_text(&TextCommand::Ping.to_string()) {
            Ok(reply) if reply == PONG => {
                self.console.success("ping succeeded");
                true
            }
            Ok(reply) => {
                self.console.failure(format_args!("ping failed, reply: {reply}"));
                false
            }
            Err(error) => {
                self.console.failure(format_args!("ping failed: {error}"));
                false
            }
        }
    }

    /// Echo round trip; succeeds when the reply equals `message` exactly.
    pub(crate) fn echo_test(&mut self, message: &str) -> bool {
        self.console.sending(format_args!("echo: {message}"));
        let command = TextCommand::Echo(message.to_owned());
        match self.client.send_text(&command.to_string()) {
            Ok(reply) if reply == message => {
                self.console.success("echo succeeded");
                true
            }
            Ok(reply) => {
                self.console.failure(format_args!(
                    "echo failed, expected: {message}, got: {reply}"
                ));
                false
            }
            Err(error) => {
                self.console.failure(format_args!("echo failed: {error}"));
                false
            }
        }
    }

    /// Text status query; any reply counts.
    pub(crate) fn status_text(&mut self) -> Option<String> {
        match self.client.send_text(&TextCommand::Status.to_string()) {
            Ok(reply) => {
                self.console.sending(format_args!("server status: {reply}"));
                Some(reply)
            }
            Err(error) => {
                self.console.failure(format_args!("status query failed: {error}"));
                None
            }
        }
    }

    /// JSON ping; succeeds when the reply `type` is `pong`.
    pub(crate) fn json_ping(&mut self) -> bool {
        self.console.sending("JSON ping");
        let request = RequestData::from(CommandName::Ping);
        match self.client.send_json(MSG_TYPE_PING, &request, None) {
            Ok(reply) if reply.kind() == ReplyKind::Pong => {
                self.console.success("JSON ping succeeded");
                true
            }
            outcome => {
                self.report_failure("JSON ping failed", &outcome);
                false
            }
        }
    }

    /// Fetches and prints the device description.
    pub(crate) fn device_info(&mut self) -> Option<Map<String, Value>> {
        self.console.sending("fetching device info");
        match self.command(CommandName::GetDeviceInfo) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                self.console.success("device info:");
                let info = reply.data_object().cloned().unwrap_or_default();
                self.console.fields(&info);
                Some(info)
            }
            outcome => {
                self.report_failure("device info failed", &outcome);
                None
            }
        }
    }

    /// Fetches the device clock; any successful exchange counts.
    pub(crate) fn server_time(&mut self) -> Option<Value> {
        match self.command(CommandName::GetTime) {
            Ok(reply) => {
                let data = reply.data().cloned();
                self.console
                    .sending(format_args!("server timestamp: {}", render_optional(data.as_ref())));
                data
            }
            Err(error) => {
                self.console.failure(format_args!("time query failed: {error}"));
                None
            }
        }
    }

    /// Asks the device whether its voice-test SDK is ready.
    pub(crate) fn voice_init(&mut self) -> bool {
        self.console.sending("initialising voice-test SDK");
        match self.command(CommandName::VoiceInit) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                self.console.success("voice-test SDK initialised");
                true
            }
            outcome => {
                self.report_failure("voice-test SDK initialisation failed", &outcome);
                false
            }
        }
    }

    /// Starts a voice test for `title` in sound zone `area`.
    pub(crate) fn voice_start_test(&mut self, title: &str, area: &str) -> bool {
        self.console
            .sending(format_args!("starting voice test, utterance: {title}, area: {area}"));
        let request = RequestData::from(StartTestRequest::new(title, area));
        match self.client.send_json(MSG_TYPE_COMMAND, &request, None) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                self.console.success("voice test started");
                true
            }
            outcome => {
                self.report_failure("voice test failed to start", &outcome);
                false
            }
        }
    }

    /// Reports whether a voice-test result is ready.
    pub(crate) fn voice_check_result(&mut self) -> bool {
        self.console.sending("checking voice-test result");
        match self.command(CommandName::VoiceCheckResult) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                let check = CheckResult::from_data(reply.data_object());
                let status = check.status.as_deref().unwrap_or("unknown");
                self.console.success(format_args!(
                    "status: {status}, has result: {}",
                    check.has_result
                ));
                check.has_result
            }
            outcome => {
                self.report_failure("result check failed", &outcome);
                false
            }
        }
    }

    /// Fetches the voice-test result once it exists.
    ///
    /// Returns `None` while the device reports no `result`, printing the
    /// device's explanation when it sends one.
    pub(crate) fn voice_get_result(&mut self) -> Option<VoiceResult> {
        self.console.sending("fetching voice-test result");
        match self.command(CommandName::VoiceGetResult) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                let data = reply.data_object().cloned().unwrap_or_default();
                match VoiceResult::from_data(&data) {
                    Some(result) => {
                        self.console.success("voice-test result:");
                        self.console.detail("result", render_value(&result.result));
                        self.console.detail("exeID", render_optional(result.exe_id.as_ref()));
                        self.console.detail("status", render_optional(result.status.as_ref()));
                        Some(result)
                    }
                    None => {
                        let message = data
                            .get("message")
                            .map_or_else(|| String::from("test result not ready yet"), render_value);
                        self.console.waiting(message);
                        None
                    }
                }
            }
            outcome => {
                self.report_failure("fetching voice-test result failed", &outcome);
                None
            }
        }
    }

    /// Fetches and prints the voice-test SDK status.
    pub(crate) fn voice_get_status(&mut self) -> Option<Map<String, Value>> {
        self.console.sending("querying voice-test SDK status");
        match self.command(CommandName::VoiceGetStatus) {
            Ok(reply) if reply.kind() == ReplyKind::Response => {
                self.console.success("voice-test SDK status:");
                let status = reply.data_object().cloned().unwrap_or_default();
                self.console.fields(&status);
                Some(status)
            }
            outcome => {
                self.report_failure("voice-test SDK status failed", &outcome);
                None
            }
        }
    }

    fn command(&mut self, name: CommandName) -> Result<Reply, ClientError> {
        self.client
            .send_json(MSG_TYPE_COMMAND, &RequestData::from(name), None)
    }

    fn report_failure(&mut self, what: &str, outcome: &Result<Reply, ClientError>) {
        match outcome {
            Ok(reply) => {
                let detail = reply.error_message().unwrap_or_else(|| reply.to_string());
                self.console.failure(format_args!("{what}: {detail}"));
            }
            Err(error) => self.console.failure(format_args!("{what}: {error}")),
        }
    }
}
