//! BDD step definitions for client behaviour.
//!
//! These steps map the scenarios in `tests/features/adbt_cli.feature` onto
//! full client runs against a fake device.

use super::support::*;

use std::cell::RefCell;
use std::process::ExitCode;

use rstest_bdd_macros::{given, scenario, then, when};

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

#[given("a simulated device")]
fn given_simulated_device(world: &RefCell<TestWorld>) {
    let device = FakeDevice::simulated(SimulatedDevice::default()).expect("spawn simulated device");
    world.borrow_mut().attach_device(device);
}

#[given("a device replying {reply}")]
fn given_device_replying(world: &RefCell<TestWorld>, reply: String) {
    let device = FakeDevice::replying(unquote(&reply)).expect("spawn replying device");
    world.borrow_mut().attach_device(device);
}

#[given("no device is listening")]
fn given_no_device(world: &RefCell<TestWorld>) {
    world
        .borrow_mut()
        .point_at_closed_port()
        .expect("reserve closed port");
}

#[given("the operator types {line}")]
fn given_operator_types(world: &RefCell<TestWorld>, line: String) {
    world.borrow_mut().type_line(unquote(&line));
}

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: String) {
    world.borrow_mut().run(&command).expect("client run completes");
}

#[then("the client succeeds")]
fn then_client_succeeds(world: &RefCell<TestWorld>) {
    let world = world.borrow();
    assert_eq!(
        world.exit_code,
        Some(ExitCode::SUCCESS),
        "stderr: {}",
        world.stderr_text()
    );
}

#[then("the client fails")]
fn then_client_fails(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code, Some(ExitCode::FAILURE));
}

#[then("stdout contains {snippet}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, snippet: String) {
    let world = world.borrow();
    let stdout = world.stdout_text();
    let snippet = unquote(&snippet);
    assert!(
        stdout.contains(snippet),
        "stdout {stdout:?} did not contain {snippet:?}"
    );
}

#[then("stderr contains {snippet}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, snippet: String) {
    let world = world.borrow();
    let stderr = world.stderr_text();
    let snippet = unquote(&snippet);
    assert!(
        stderr.contains(snippet),
        "stderr {stderr:?} did not contain {snippet:?}"
    );
}

#[then("the device receives {count} requests")]
fn then_device_receives(world: &RefCell<TestWorld>, count: usize) {
    let world = world.borrow();
    assert_eq!(world.requests.len(), count, "requests: {:?}", world.requests);
}

#[scenario(path = "tests/features/adbt_cli.feature")]
fn adbt_cli_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
