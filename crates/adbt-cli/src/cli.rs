//! CLI argument definitions for the test client.

use clap::{Parser, ValueEnum};

/// Test sequence to run once connected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    /// Fixed ping, echo, status, JSON ping, device info and time checks.
    Basic,
    /// Voice-test SDK scenario with result polling.
    Voice,
    /// Read requests from the operator one line at a time.
    Interactive,
}

/// Manual test client for the device transport protocol.
///
/// Configuration flags (`--config-path`, `--device-endpoint`,
/// `--receive-mode`, `--log-filter`, `--log-format`) must come before the
/// client's own flags.
#[derive(Parser, Debug)]
#[command(name = "adbt-client", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Runs the given mode instead of asking for one.
    #[arg(long, value_enum)]
    pub(crate) mode: Option<Mode>,
}
