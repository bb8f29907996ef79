//! Ctrl-C handling.
//!
//! The first SIGINT raises a flag that the polling and interactive loops
//! check between steps, and that ends a prompt read still waiting on the
//! operator (see [`crate::InterruptibleReader`]). The session then winds down
//! and the socket is closed in order. A second SIGINT while the flag is
//! raised exits immediately.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::signal::SIGINT;
use signal_hook::flag;

/// Exit status used when a second interrupt forces termination.
const FORCED_EXIT_STATUS: i32 = 130;

/// Shared "stop requested" flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    requested: Arc<AtomicBool>,
}

impl Interrupt {
    /// Registers the SIGINT handlers for this process.
    ///
    /// # Errors
    ///
    /// Returns the OS error when a handler cannot be installed.
    pub fn install() -> io::Result<Self> {
        let interrupt = Self::default();
        // Order matters: the conditional shutdown must see the flag as it was
        // before this signal raised it.
        flag::register_conditional_shutdown(
            SIGINT,
            FORCED_EXIT_STATUS,
            Arc::clone(&interrupt.requested),
        )?;
        flag::register(SIGINT, Arc::clone(&interrupt.requested))?;
        Ok(interrupt)
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Requests a stop without a signal.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}
