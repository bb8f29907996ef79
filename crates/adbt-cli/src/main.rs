//! CLI entrypoint for the ADB transport test client.
//!
//! The binary delegates to [`adbt_cli::run`], which loads configuration,
//! connects to the device service and drives the selected test mode against
//! the standard streams. Operator input is read through an
//! [`InterruptibleReader`] so Ctrl-C also ends a pending prompt.

use std::io::{self, StderrLock, StdoutLock, Write};
use std::process::ExitCode;

use adbt_cli::{Interrupt, InterruptibleReader};

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'static> = io::stdout().lock();
    let mut stderr: StderrLock<'static> = io::stderr().lock();
    let interrupt = Interrupt::install().unwrap_or_else(|error| {
        let _ = writeln!(stderr, "warning: interrupt handling unavailable: {error}");
        Interrupt::default()
    });
    let mut stdin = InterruptibleReader::spawn(io::stdin(), interrupt.clone());
    adbt_cli::run(
        std::env::args_os(),
        &mut stdin,
        &mut stdout,
        &mut stderr,
        &interrupt,
    )
}
