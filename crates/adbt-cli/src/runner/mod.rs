//! Test sequences driven against a connected client.
//!
//! A process runs exactly one mode. The mode either comes from `--mode` or is
//! chosen from a numbered menu read from the operator's input.

mod basic;
mod interactive;
mod voice;

use std::io::{BufRead, Write};

pub(crate) use basic::run_basic_checks;
pub(crate) use interactive::run_interactive;
pub(crate) use voice::{VoiceSchedule, run_voice_scenario};

use crate::Interrupt;
use crate::cli::Mode;
use crate::console::Console;
use crate::harness::Harness;

/// Everything a mode needs besides the harness.
pub(crate) struct RunContext<'a, R: BufRead> {
    pub(crate) input: &'a mut R,
    pub(crate) interrupt: &'a Interrupt,
    pub(crate) schedule: VoiceSchedule,
}

pub(crate) fn run_mode<R, W>(mode: Mode, harness: &mut Harness<'_, W>, context: &mut RunContext<'_, R>)
where
    R: BufRead,
    W: Write,
{
    match mode {
        Mode::Basic => run_basic_checks(harness),
        Mode::Voice => run_voice_scenario(harness, context.schedule, context.interrupt),
        Mode::Interactive => run_interactive(harness, context.input, context.interrupt),
    }
    harness.console().flush();
}

/// Shows the numbered menu and reads the operator's choice.
///
/// Anything other than `1`, `2` or `3`, including end of input, falls back
/// to the basic checks.
pub(crate) fn select_mode<R, W>(input: &mut R, console: &mut Console<W>) -> Mode
where
    R: BufRead,
    W: Write,
{
    console.line("Choose a test mode:");
    console.line("1. Basic checks");
    console.line("2. Voice test scenario");
    console.line("3. Interactive mode");
    console.prompt("Enter choice (1-3): ");

    let mut choice = String::new();
    let read = input.read_line(&mut choice).unwrap_or(0);
    if read == 0 {
        console.blank();
    }
    match choice.trim() {
        "1" => Mode::Basic,
        "2" => Mode::Voice,
        "3" => Mode::Interactive,
        _ => {
            console.line("Invalid choice, running basic checks");
            Mode::Basic
        }
    }
}
