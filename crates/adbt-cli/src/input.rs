//! Operator input that gives way to Ctrl-C.
//!
//! A SIGINT does not wake a blocking read of the terminal, so the operator's
//! stream is read on a helper thread and handed over in chunks. Waiting for
//! the next chunk polls the [`Interrupt`] flag; once a stop is requested the
//! pending read fails with [`StopRequested`] instead of blocking.

use std::fmt;
use std::io::{self, BufRead, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::Interrupt;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CHUNK_SIZE: usize = 4096;

/// Error payload of a read abandoned because a stop was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopRequested;

impl fmt::Display for StopRequested {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("input abandoned after an interrupt")
    }
}

impl std::error::Error for StopRequested {}

/// Buffered reader fed by a background thread.
///
/// The helper thread ends at end of input or on the first read error. A
/// thread still blocked on the terminal when the session ends is left to
/// the process exit.
#[derive(Debug)]
pub struct InterruptibleReader {
    chunks: Receiver<io::Result<Vec<u8>>>,
    buffer: Vec<u8>,
    position: usize,
    finished: bool,
    interrupt: Interrupt,
}

impl InterruptibleReader {
    /// Starts reading `inner` on a helper thread.
    pub fn spawn<R>(mut inner: R, interrupt: Interrupt) -> Self
    where
        R: Read + Send + 'static,
    {
        let (sender, chunks) = mpsc::channel();
        thread::spawn(move || {
            let mut chunk = vec![0_u8; CHUNK_SIZE];
            loop {
                let outcome = match inner.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(read) => Ok(chunk.get(..read).unwrap_or_default().to_vec()),
                    Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                    Err(error) => Err(error),
                };
                let failed = outcome.is_err();
                if sender.send(outcome).is_err() || failed {
                    break;
                }
            }
            debug!("operator input closed");
        });
        Self {
            chunks,
            buffer: Vec::new(),
            position: 0,
            finished: false,
            interrupt,
        }
    }
}

/// Whether `error` came from a read abandoned after an interrupt.
pub(crate) fn is_stop_requested(error: &io::Error) -> bool {
    error
        .get_ref()
        .is_some_and(|inner| inner.is::<StopRequested>())
}

impl Read for InterruptibleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

impl BufRead for InterruptibleReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.position >= self.buffer.len() && !self.finished {
            // `read_line` retries `ErrorKind::Interrupted`, so the stop is
            // reported under another kind.
            if self.interrupt.is_requested() {
                return Err(io::Error::other(StopRequested));
            }
            match self.chunks.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(chunk)) => {
                    self.buffer = chunk;
                    self.position = 0;
                }
                Ok(Err(error)) => {
                    self.finished = true;
                    return Err(error);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.finished = true,
            }
        }
        Ok(self.buffer.get(self.position..).unwrap_or_default())
    }

    fn consume(&mut self, amount: usize) {
        self.position = (self.position + amount).min(self.buffer.len());
    }
}
