use std::io::Write;

use crate::harness::Harness;

/// Literal sent by the echo check.
pub(crate) const ECHO_SAMPLE: &str = "Hello Android!";

/// Runs the fixed basic checks. Outcomes are printed, never acted upon.
pub(crate) fn run_basic_checks<W: Write>(harness: &mut Harness<'_, W>) {
    harness.console().blank();
    harness.console().line("=== Basic checks ===");

    harness.ping();
    harness.echo_test(ECHO_SAMPLE);
    harness.status_text();
    harness.json_ping();
    harness.device_info();
    harness.server_time();
}
