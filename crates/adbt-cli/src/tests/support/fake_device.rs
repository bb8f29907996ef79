//! Fake device service for client tests.
//!
//! [`FakeDevice`] accepts a single connection and answers each request line
//! through a responder closure. [`SimulatedDevice`] is a responder that
//! behaves like the device service, including a voice-test SDK whose results
//! become ready after a configurable number of checks.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};

type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;

/// A mock device that serves one connection on an ephemeral TCP port.
pub(in crate::tests) struct FakeDevice {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDevice {
    /// Spawns a device answering each request with `responder`. Returning
    /// `None` closes the connection without a reply.
    pub fn spawn<F>(responder: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String> + Send + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake device")?;
        listener
            .set_nonblocking(true)
            .context("fake device nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let responder: Responder = Box::new(responder);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, responder, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    /// Spawns a device that sends `reply` to every request.
    pub fn replying(reply: &str) -> Result<Self> {
        let reply = reply.to_owned();
        Self::spawn(move |_| Some(reply.clone()))
    }

    /// Spawns a device backed by `device`.
    pub fn simulated(mut device: SimulatedDevice) -> Result<Self> {
        Self::spawn(move |request| Some(device.reply(request)))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the connection to finish and returns every request line
    /// received, delimiter included.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake device thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake device result: {error}"))?
            .take()
        {
            outcome.context("fake device failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        responder: Responder,
        requests: &Mutex<Vec<String>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Self::answer_requests(stream, responder, requests),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // Nobody connected; the client failed before reaching us.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn answer_requests(
        stream: TcpStream,
        mut responder: Responder,
        requests: &Mutex<Vec<String>>,
    ) -> Result<()> {
        stream
            .set_nonblocking(false)
            .context("fake device blocking stream")?;
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut writer = stream;
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).context("read request")? == 0 {
                return Ok(());
            }
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(line.clone());
            let Some(reply) = responder(line.trim_end_matches('\n')) else {
                return Ok(());
            };
            let mut frame = reply.into_bytes();
            frame.push(b'\n');
            writer.write_all(&frame).context("write reply")?;
            writer.flush().context("flush reply")?;
        }
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// In-memory stand-in for the device's message handler.
#[derive(Debug, Clone)]
pub(in crate::tests) struct SimulatedDevice {
    sdk_initialised: bool,
    checks_until_ready: u32,
    remaining_checks: u32,
    running: bool,
    test_count: u32,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self {
            sdk_initialised: true,
            checks_until_ready: 0,
            remaining_checks: 0,
            running: false,
            test_count: 0,
        }
    }
}

impl SimulatedDevice {
    /// Each started test answers `checks` result checks as still running
    /// before reporting its result as ready.
    pub fn with_checks_until_ready(checks: u32) -> Self {
        Self {
            checks_until_ready: checks,
            ..Self::default()
        }
    }

    /// A device whose voice-test SDK was never initialised.
    pub fn uninitialised() -> Self {
        Self {
            sdk_initialised: false,
            ..Self::default()
        }
    }

    pub fn reply(&mut self, request: &str) -> String {
        match serde_json::from_str::<Value>(request) {
            Ok(Value::Object(envelope)) => {
                let id = envelope.get("id").cloned().unwrap_or(Value::Null);
                let kind = envelope.get("type").and_then(Value::as_str).unwrap_or_default();
                let data = envelope.get("data").cloned().unwrap_or(Value::Null);
                self.reply_json(kind, &id, &data).to_string()
            }
            _ => reply_text(request),
        }
    }

    fn reply_json(&mut self, kind: &str, id: &Value, data: &Value) -> Value {
        match kind {
            "ping" => json!({"type": "pong", "id": id, "data": "pong", "timestamp": 1}),
            "echo" => response(id, data.clone()),
            "command" => {
                let command = match data {
                    Value::String(name) => name.clone(),
                    Value::Object(fields) => match fields.get("command").and_then(Value::as_str) {
                        Some(name) => name.to_owned(),
                        None => return error("missing command field"),
                    },
                    Value::Null => return error("empty command"),
                    other => other.to_string(),
                };
                self.reply_command(&command, id, data)
            }
            other => error(&format!("unknown message type: {other}")),
        }
    }

    fn reply_command(&mut self, command: &str, id: &Value, data: &Value) -> Value {
        match command {
            "get_device_info" => response(
                id,
                json!({
                    "model": "Pixel 8",
                    "manufacturer": "Google",
                    "version": "14",
                    "sdk": 34,
                }),
            ),
            "get_time" => response(id, json!(1_700_000_000_000_i64)),
            "voice_init" if self.sdk_initialised => response(id, json!("voice-test SDK initialised")),
            "voice_get_status" => response(
                id,
                json!({
                    "initialized": self.sdk_initialised,
                    "hasResult": self.has_result(),
                    "currentExeID": format!("exe-{}", self.test_count),
                    "testCount": self.test_count,
                }),
            ),
            "voice_init" | "voice_start_test" | "voice_check_result" | "voice_get_result"
                if !self.sdk_initialised =>
            {
                voice_error("voice-test SDK not initialised")
            }
            "voice_start_test" => {
                self.running = true;
                self.remaining_checks = self.checks_until_ready;
                self.test_count += 1;
                response(
                    id,
                    json!({
                        "message": "voice test started",
                        "title": data.get("title").cloned().unwrap_or(Value::Null),
                        "area": data.get("area").cloned().unwrap_or(Value::Null),
                        "status": "testing",
                    }),
                )
            }
            "voice_check_result" => {
                let has_result = self.has_result();
                if self.running && !has_result {
                    self.remaining_checks -= 1;
                }
                let status = if has_result { "completed" } else { "testing" };
                response(id, json!({"hasResult": has_result, "status": status}))
            }
            "voice_get_result" if self.has_result() => {
                self.running = false;
                response(
                    id,
                    json!({
                        "result": "PASS",
                        "exeID": format!("exe-{}", self.test_count),
                        "status": "completed",
                    }),
                )
            }
            "voice_get_result" => response(
                id,
                json!({"message": "test result not ready yet", "status": "testing"}),
            ),
            other => error(&format!("unknown command: {other}")),
        }
    }

    fn has_result(&self) -> bool {
        self.running && self.remaining_checks == 0
    }
}

fn reply_text(text: &str) -> String {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "ping" => String::from("pong"),
        "hello" => String::from("Hello from Android ADB Server!"),
        "status" => String::from("Server is running"),
        _ if lower.starts_with("echo ") => trimmed.get(5..).unwrap_or_default().to_owned(),
        _ => format!("Unknown command: {trimmed}"),
    }
}

fn response(id: &Value, data: Value) -> Value {
    json!({"type": "response", "id": id, "data": data, "timestamp": 1})
}

fn error(message: &str) -> Value {
    json!({"type": "error", "data": message, "timestamp": 1})
}

fn voice_error(message: &str) -> Value {
    json!({
        "type": "error",
        "data": {"error": message, "category": "VOICE_TEST_ERROR"},
        "timestamp": 1,
    })
}
