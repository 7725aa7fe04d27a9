//! Configuration system for the serial line simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline line settings and the testbench tick budget.
//! 2. **Structures:** Line model settings (`UartConfig`) and testbench settings (`SimConfig`).
//! 3. **Loading:** JSON text or files, with every field optional.
//!
//! Use `Config::default()` when no file is given; the CLI overlays its flags on top.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{MAX_BAUD_DIVISOR, MAX_STOP_BITS};
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Ticks per bit period (one bit every 25 clocks).
    pub const BAUD_DIVISOR: u32 = crate::common::constants::DEFAULT_BAUD_DIVISOR;

    /// Stop bits per transmitted frame.
    pub const STOP_BITS: u8 = crate::common::constants::DEFAULT_STOP_BITS;

    /// Clock ticks the testbench runs before giving up.
    pub const MAX_TICKS: u64 = 2000;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use uartsim_core::config::Config;
///
/// let json = r#"{
///     "uart": { "baud_divisor": 16, "stop_bits": 2 },
///     "sim": { "max_ticks": 100000, "trace_path": "line.vcd" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.uart.baud_divisor, 16);
/// assert_eq!(config.uart.stop_bits, 2);
/// assert!(!config.uart.output_to_stderr);
/// assert_eq!(config.sim.max_ticks, 100_000);
/// assert_eq!(config.sim.trace_path.as_deref(), Some("line.vcd"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Line model settings
    #[serde(default)]
    pub uart: UartConfig,
    /// Testbench settings
    #[serde(default)]
    pub sim: SimConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the [`Config::validate`]
    /// errors for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks value ranges that the type system does not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`], [`ConfigError::DivisorTooLarge`] or
    /// [`ConfigError::InvalidStopBits`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uart.baud_divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        if self.uart.baud_divisor > MAX_BAUD_DIVISOR {
            return Err(ConfigError::DivisorTooLarge(self.uart.baud_divisor));
        }
        if !(1..=MAX_STOP_BITS).contains(&self.uart.stop_bits) {
            return Err(ConfigError::InvalidStopBits(self.uart.stop_bits));
        }
        Ok(())
    }
}

/// Serial line model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UartConfig {
    /// Simulation clock ticks per bit period
    #[serde(default = "UartConfig::default_baud_divisor")]
    pub baud_divisor: u32,

    /// Stop bits appended to each transmitted frame (1 or 2)
    #[serde(default = "UartConfig::default_stop_bits")]
    pub stop_bits: u8,

    /// When true, decoded output goes to stderr instead of stdout.
    #[serde(default)]
    pub output_to_stderr: bool,
}

impl UartConfig {
    /// Returns the default baud divisor.
    const fn default_baud_divisor() -> u32 {
        defaults::BAUD_DIVISOR
    }

    /// Returns the default stop bit count.
    const fn default_stop_bits() -> u8 {
        defaults::STOP_BITS
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_divisor: defaults::BAUD_DIVISOR,
            stop_bits: defaults::STOP_BITS,
            output_to_stderr: false,
        }
    }
}

/// Clock-driving testbench settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Clock ticks to run before stopping
    #[serde(default = "SimConfig::default_max_ticks")]
    pub max_ticks: u64,

    /// Write a VCD waveform of the UART pins to this path
    #[serde(default)]
    pub trace_path: Option<String>,

    /// Stop once both directions have been idle this many ticks after at least one
    /// frame has been decoded from the device.
    #[serde(default)]
    pub idle_ticks_to_halt: Option<u64>,
}

impl SimConfig {
    /// Returns the default tick budget.
    const fn default_max_ticks() -> u64 {
        defaults::MAX_TICKS
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_ticks: defaults::MAX_TICKS,
            trace_path: None,
            idle_ticks_to_halt: None,
        }
    }
}
