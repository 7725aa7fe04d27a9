//! Operator input and console output capabilities.
//!
//! The line model reaches the outside world at exactly two points: it polls a
//! [`CharSource`] when its transmitter is idle and hands every decoded byte to a
//! [`ByteSink`]. Neither call may block. Scripted implementations (`VecDeque<u8>`,
//! `Vec<u8>`, closures) make the model deterministic under test; [`StdinSource`] and
//! [`ConsoleSink`] attach it to a real terminal.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

/// Non-blocking supply of operator characters.
pub trait CharSource {
    /// Returns the next pending character, or `None` if nothing is waiting.
    ///
    /// `None` is the normal, expected answer on most ticks.
    fn try_read(&mut self) -> Option<u8>;
}

/// Destination for bytes decoded from the device's transmit line.
pub trait ByteSink {
    /// Accepts one byte.
    fn write_byte(&mut self, byte: u8);

    /// Makes previously written bytes visible. Called after every completed frame.
    fn flush(&mut self) {}
}

impl CharSource for VecDeque<u8> {
    fn try_read(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl<F> CharSource for F
where
    F: FnMut() -> Option<u8>,
{
    fn try_read(&mut self) -> Option<u8> {
        self()
    }
}

impl ByteSink for Vec<u8> {
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }
}

impl<K: ByteSink + ?Sized> ByteSink for Box<K> {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// A source that never has a character pending.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl CharSource for NoInput {
    fn try_read(&mut self) -> Option<u8> {
        None
    }
}

/// Operator input read from the process's standard input.
///
/// A background thread performs the blocking reads and forwards each byte over a
/// channel; [`try_read`](CharSource::try_read) only drains what has already arrived.
pub struct StdinSource {
    /// Channel receiver fed by the stdin thread.
    rx: Receiver<u8>,
    /// Set once the reader thread has hung up (stdin reached EOF or failed).
    closed: bool,
}

impl StdinSource {
    /// Spawns the stdin reader thread.
    pub fn spawn() -> Self {
        let (tx, rx) = channel();

        let _reader = thread::spawn(move || {
            let mut buffer = [0u8; 1];
            let stdin = io::stdin();
            let mut handle = stdin.lock();
            while handle.read_exact(&mut buffer).is_ok() {
                if tx.send(buffer[0]).is_err() {
                    break;
                }
            }
        });

        Self { rx, closed: false }
    }

    /// Returns true once standard input has been exhausted and fully drained.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdinSource")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl CharSource for StdinSource {
    fn try_read(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(byte) => Some(byte),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.closed {
                    tracing::debug!("operator input closed");
                    self.closed = true;
                }
                None
            }
        }
    }
}

/// Console output on stdout, or stderr when the caller needs stdout kept clean.
///
/// Write failures cannot be reported through the tick path. The first one is logged
/// and later bytes are still attempted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink {
    /// When true, output goes to stderr.
    to_stderr: bool,
    /// Set after the first failed write or flush.
    failed: bool,
}

impl ConsoleSink {
    /// Creates a console sink.
    ///
    /// # Arguments
    ///
    /// * `to_stderr` - When true, write output to stderr instead of stdout.
    pub const fn new(to_stderr: bool) -> Self {
        Self {
            to_stderr,
            failed: false,
        }
    }

    /// Returns true once a write or flush to the console has failed.
    pub const fn has_failed(&self) -> bool {
        self.failed
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(error) = result
            && !self.failed
        {
            tracing::warn!(%error, to_stderr = self.to_stderr, "console output failed");
            self.failed = true;
        }
    }
}

impl ByteSink for ConsoleSink {
    fn write_byte(&mut self, byte: u8) {
        let buf = [byte];
        let result = if self.to_stderr {
            io::stderr().write_all(&buf)
        } else {
            io::stdout().write_all(&buf)
        };
        self.record(result);
    }

    fn flush(&mut self) {
        let result = if self.to_stderr {
            io::stderr().flush()
        } else {
            io::stdout().flush()
        };
        self.record(result);
    }
}
