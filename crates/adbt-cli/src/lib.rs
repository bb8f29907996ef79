//! Runtime for the ADB transport test client.
//!
//! The client connects to a device service (usually reached through
//! `adb forward`), then runs one of three test modes against it: fixed basic
//! checks, the voice-test scenario, or an interactive prompt. Configuration
//! loading and the standard streams are injected so tests can drive the
//! whole session against a fake device.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use adbt_config::{Config, DEVICE_SERVICE_PORT};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;

mod cli;
mod client;
mod config;
mod console;
mod errors;
mod harness;
mod input;
mod interrupt;
mod runner;
mod telemetry;
mod transport;

use cli::Cli;
pub use cli::Mode;
pub use client::ProtocolClient;
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use console::Console;
pub(crate) use errors::AppError;
pub use errors::ClientError;
use harness::Harness;
pub use input::{InterruptibleReader, StopRequested};
pub use interrupt::Interrupt;
use runner::{RunContext, VoiceSchedule, run_mode, select_mode};

/// Bundles the streams handed to the client runtime.
pub(crate) struct IoStreams<'a, R: BufRead, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

struct CliRunner<'a, 'io, R: BufRead, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'io, R, W, E>,
    loader: &'a L,
    interrupt: &'a Interrupt,
    schedule: VoiceSchedule,
    telemetry: bool,
}

impl<'a, 'io, R, W, E, L> CliRunner<'a, 'io, R, W, E, L>
where
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'io, R, W, E>, loader: &'a L, interrupt: &'a Interrupt) -> Self {
        Self {
            io,
            loader,
            interrupt,
            schedule: VoiceSchedule::default(),
            telemetry: true,
        }
    }

    #[cfg(test)]
    fn for_tests(mut self) -> Self {
        self.schedule = VoiceSchedule::immediate();
        self.telemetry = false;
        self
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let cli = match Cli::try_parse_from(&split.cli_arguments) {
            Ok(cli) => cli,
            Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                let _ = write!(self.io.stdout, "{error}");
                return ExitCode::SUCCESS;
            }
            Err(error) => return self.fail(&AppError::CliUsage(error)),
        };

        let result = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| self.start_telemetry(&config).map(|()| config))
            .and_then(|config| self.run_session(cli.mode, &config));

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => self.fail(&error),
        }
    }

    fn fail(&mut self, error: &AppError) -> ExitCode {
        let _ = writeln!(self.io.stderr, "{error}");
        ExitCode::FAILURE
    }

    fn start_telemetry(&self, config: &Config) -> Result<(), AppError> {
        if self.telemetry {
            telemetry::initialise(config)?;
        }
        Ok(())
    }

    fn run_session(&mut self, mode: Option<Mode>, config: &Config) -> Result<(), AppError> {
        let endpoint = config.device_endpoint();
        {
            let mut console = Console::new(&mut *self.io.stdout);
            console.line("ADB Transport test client");
            console.line("=".repeat(40));
            console.line("Make sure ADB port forwarding is set up:");
            console.line(format_args!(
                "adb forward tcp:{} tcp:{DEVICE_SERVICE_PORT}",
                endpoint.port()
            ));
            console.blank();
            console.flush();
        }

        let mut client = ProtocolClient::new(config.receive_mode());
        client.connect(endpoint).map_err(AppError::Connect)?;

        let mut harness = Harness::new(&mut client, &mut *self.io.stdout);
        harness.console().success(format_args!("connected to {endpoint}"));
        let mode = match mode {
            Some(mode) => mode,
            None => select_mode(&mut *self.io.stdin, harness.console()),
        };
        info!(?mode, "running test mode");

        let mut context = RunContext {
            input: &mut *self.io.stdin,
            interrupt: self.interrupt,
            schedule: self.schedule,
        };
        if self.interrupt.is_requested() {
            harness.console().line("Interrupted before a mode was chosen");
        } else {
            run_mode(mode, &mut harness, &mut context);
        }

        if harness.client().disconnect() {
            harness.console().blank();
            harness.console().line("Disconnected");
        }
        harness.console().flush();
        Ok(())
    }
}

/// Runs the client with the given arguments, streams and interrupt flag.
///
/// Returns [`ExitCode::FAILURE`] when configuration cannot be loaded or the
/// device cannot be reached; failures of individual checks are reported on
/// `stdout` and do not affect the exit code.
#[must_use]
pub fn run<I, R, W, E>(
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
    interrupt: &Interrupt,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    CliRunner::new(&mut io, &OrthoConfigLoader, interrupt).run(args)
}

/// Runs the client with a custom configuration loader, no telemetry and no
/// voice-scenario delays.
#[cfg(test)]
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
    interrupt: &Interrupt,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader, interrupt).for_tests().run(args)
}
