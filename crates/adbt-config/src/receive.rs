use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Strategy for reading one reply frame from the device.
///
/// The device service answers each request with exactly one line, but the
/// historical client never waited for the delimiter: it issued a single read
/// of [`SINGLE_READ_LIMIT`] bytes and treated whatever arrived as the reply.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReceiveMode {
    /// One blocking read of at most [`SINGLE_READ_LIMIT`] bytes. Longer
    /// replies are truncated.
    #[default]
    SingleRead,
    /// Accumulate reads until a newline arrives.
    Line,
}

/// Buffer size used by [`ReceiveMode::SingleRead`].
pub const SINGLE_READ_LIMIT: usize = 1024;
