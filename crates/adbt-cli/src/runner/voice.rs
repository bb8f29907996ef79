use std::io::Write;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::Interrupt;
use crate::harness::Harness;

/// Utterances played by the scenario, paired with the sound zone each one
/// targets.
pub(crate) const VOICE_CASES: [(&str, &str); 5] = [
    ("你好，这是语音测试", "2"),
    ("欢迎使用语音识别系统", "1"),
    ("请说出您的姓名", "3"),
    ("今天天气真不错", "4"),
    ("语音测试完成，谢谢配合", "2"),
];

/// Timing of the voice scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VoiceSchedule {
    /// Wait after a successful init before querying status again.
    pub(crate) settle: Duration,
    /// Wait before each result check.
    pub(crate) poll_interval: Duration,
    /// Result checks per case.
    pub(crate) max_polls: u32,
}

impl Default for VoiceSchedule {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            poll_interval: Duration::from_secs(1),
            max_polls: 10,
        }
    }
}

impl VoiceSchedule {
    #[cfg(test)]
    pub(crate) const fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            poll_interval: Duration::ZERO,
            max_polls: 10,
        }
    }
}

pub(crate) fn run_voice_scenario<W: Write>(
    harness: &mut Harness<'_, W>,
    schedule: VoiceSchedule,
    interrupt: &Interrupt,
) {
    harness.console().blank();
    harness.console().line("=== Voice test scenario ===");

    harness.voice_get_status();
    if harness.voice_init() {
        pause(schedule.settle);
        harness.voice_get_status();
    }

    for (index, (title, area)) in VOICE_CASES.iter().enumerate() {
        if interrupt.is_requested() {
            harness.console().line("Interrupted, skipping remaining cases");
            break;
        }
        harness.console().blank();
        harness
            .console()
            .line(format_args!("--- Case {} of {} ---", index + 1, VOICE_CASES.len()));
        if harness.voice_start_test(title, area) {
            poll_for_result(harness, schedule, interrupt);
        }
    }

    harness.console().blank();
    harness.voice_get_status();
}

/// Polls until a result has been fetched or the attempts run out.
fn poll_for_result<W: Write>(
    harness: &mut Harness<'_, W>,
    schedule: VoiceSchedule,
    interrupt: &Interrupt,
) {
    for attempt in 1..=schedule.max_polls {
        if interrupt.is_requested() {
            return;
        }
        pause(schedule.poll_interval);
        debug!(attempt, "checking voice-test result");
        if harness.voice_check_result() {
            if harness.voice_get_result().is_some() {
                return;
            }
        } else {
            harness.console().waiting("test still running");
        }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
