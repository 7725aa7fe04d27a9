//! Line statistics collection and reporting.
//!
//! This module tracks diagnostic counters for the serial line model. It provides:
//! 1. **Timing:** Total ticks the model has been clocked.
//! 2. **Traffic:** Frames received from and sent to the device.
//! 3. **Irregularities:** Falling edges ignored because a frame was already in progress.
//!
//! Counters are observational only; nothing in the line model reads them back.

use std::fmt;

/// Diagnostic counters for one line model instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Total ticks the model has been clocked.
    pub ticks: u64,
    /// Bytes decoded from the device's transmit line.
    pub frames_received: u64,
    /// Frames fully shifted onto the device's receive line.
    pub frames_sent: u64,
    /// Line feeds that were preceded by an inserted carriage return.
    pub newlines_translated: u64,
    /// Falling edges seen mid-frame and ignored by the receiver.
    pub edges_ignored: u64,
}

impl LineStats {
    /// Prints the statistics report to stderr.
    ///
    /// Stdout is reserved for the decoded console stream.
    pub fn print(&self) {
        eprint!("{self}");
    }
}

impl fmt::Display for LineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n==========================================================")?;
        writeln!(f, "SERIAL LINE STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "sim_ticks                {}", self.ticks)?;
        writeln!(f, "rx_frames                {}", self.frames_received)?;
        writeln!(f, "tx_frames                {}", self.frames_sent)?;
        writeln!(f, "rx_crlf_inserted         {}", self.newlines_translated)?;
        writeln!(f, "rx_edges_ignored         {}", self.edges_ignored)?;
        writeln!(f, "----------------------------------------------------------")
    }
}
