//! Error definitions.
//!
//! This module defines the error types for the serial line simulator. It provides:
//! 1. **Configuration Errors:** Invalid baud divisors, stop bit counts, and unreadable config files.
//! 2. **Simulation Errors:** Failures of the testbench surroundings (configuration, waveform output).
//!
//! The per-tick operation of the line model never fails: irregular line timing is not
//! an error, it only desynchronizes the receiver until the next clean start bit.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or reconfiguring the line model.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The baud divisor (ticks per bit period) must be at least one.
    #[error("baud divisor must be at least 1 tick per bit")]
    ZeroDivisor,

    /// The baud divisor does not fit the 24-bit setup register field.
    ///
    /// The associated value is the rejected divisor.
    #[error("baud divisor {0} exceeds the 24-bit setup field (max 16777215)")]
    DivisorTooLarge(u32),

    /// Only one or two stop bits are supported.
    ///
    /// The associated value is the rejected stop bit count.
    #[error("unsupported stop bit count {0} (expected 1 or 2)")]
    InvalidStopBits(u8),

    /// The configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        /// Path of the file that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the clock-driving testbench.
#[derive(Debug, Error)]
pub enum SimError {
    /// The testbench was given an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing the waveform trace failed.
    #[error("waveform trace: {0}")]
    Trace(#[from] io::Error),
}
