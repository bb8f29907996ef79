//! Test support for client behaviour and unit coverage.
//!
//! Supplies a static configuration loader, a fake device service and a
//! world type that runs the whole client against it with captured streams.

mod fake_device;

use std::cell::RefCell;
use std::ffi::OsString;
use std::io::{self, Cursor, Read};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, Sender};

use adbt_config::{Config, DeviceEndpoint, ReceiveMode};
use anyhow::{Context, Result};
use rstest::fixture;

use crate::{AppError, ConfigLoader, Interrupt, IoStreams, ProtocolClient, run_with_loader};

pub(super) use fake_device::{FakeDevice, SimulatedDevice};

/// A config loader that returns a fixed configuration.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Connects a client to `device`.
pub(super) fn connected_client(device: &FakeDevice, mode: ReceiveMode) -> Result<ProtocolClient> {
    let mut client = ProtocolClient::new(mode);
    client
        .connect(&DeviceEndpoint::tcp("127.0.0.1", device.port()))
        .context("connect to fake device")?;
    Ok(client)
}

/// Parses every recorded request line as JSON, skipping text frames.
pub(super) fn json_requests(requests: &[String]) -> Vec<serde_json::Value> {
    requests
        .iter()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

/// Counts JSON requests whose `data` names `command`, either directly or
/// through a `command` field.
pub(super) fn count_commands(requests: &[String], command: &str) -> usize {
    json_requests(requests)
        .iter()
        .filter(|request| {
            let data = &request["data"];
            data.as_str() == Some(command) || data["command"].as_str() == Some(command)
        })
        .count()
}

/// Operator input that never arrives: every read blocks until the paired
/// sender is dropped, then reports end of input.
pub(super) struct SilentInput {
    release: Receiver<()>,
}

impl Read for SilentInput {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        let _ = self.release.recv();
        Ok(0)
    }
}

pub(super) fn silent_input() -> (SilentInput, Sender<()>) {
    let (sender, release) = mpsc::channel();
    (SilentInput { release }, sender)
}

/// Client run state shared by behaviour steps.
#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub device: Option<FakeDevice>,
    pub input: String,
    pub interrupt: Interrupt,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub fn attach_device(&mut self, device: FakeDevice) {
        self.config.device_endpoint = DeviceEndpoint::tcp("127.0.0.1", device.port());
        self.device = Some(device);
    }

    pub fn point_at_closed_port(&mut self) -> Result<()> {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).context("bind unused port")?;
        let port = listener.local_addr().context("unused port addr")?.port();
        drop(listener);
        self.config.device_endpoint = DeviceEndpoint::tcp("127.0.0.1", port);
        Ok(())
    }

    pub fn type_line(&mut self, line: &str) {
        self.input.push_str(line);
        self.input.push('\n');
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = Self::build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut stdin = Cursor::new(self.input.clone().into_bytes());
        let mut io = IoStreams::new(&mut stdin, &mut self.stdout, &mut self.stderr);
        let exit = run_with_loader(args, &mut io, &loader, &self.interrupt);
        self.exit_code = Some(exit);
        if let Some(device) = self.device.as_mut() {
            self.requests = device.take_requests()?;
        }
        Ok(())
    }

    fn build_args(command: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("adbt-client")];
        args.extend(
            command
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .map(OsString::from),
        );
        args
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
