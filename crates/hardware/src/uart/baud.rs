//! Baud rate configuration.
//!
//! A single divisor expresses the bit period in simulation clock ticks and is shared by
//! both directions of the line. Frames capture the divisor when they start, so a new
//! value only affects frames that begin after the change.

use crate::common::constants::{MAX_BAUD_DIVISOR, SETUP_DIVISOR_MASK};
use crate::common::error::ConfigError;

/// Number of simulation clock ticks per serial bit period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudConfig {
    divisor: u32,
}

impl BaudConfig {
    /// Creates a baud configuration of `divisor` ticks per bit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] if `divisor` is zero, or
    /// [`ConfigError::DivisorTooLarge`] if it does not fit the 24-bit setup field.
    pub fn new(divisor: u32) -> Result<Self, ConfigError> {
        if divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        if divisor > MAX_BAUD_DIVISOR {
            return Err(ConfigError::DivisorTooLarge(divisor));
        }
        Ok(Self { divisor })
    }

    /// Decodes the divisor from the setup register reported by the device.
    ///
    /// Only the low 24 bits carry the divisor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] if the masked value is zero.
    pub fn from_setup_register(raw: u32) -> Result<Self, ConfigError> {
        Self::new(raw & SETUP_DIVISOR_MASK)
    }

    /// Ticks per bit period.
    #[inline]
    pub const fn divisor(self) -> u32 {
        self.divisor
    }

    /// Countdown loaded for one full bit period.
    ///
    /// The counter is inspected once per tick and the bit boundary is taken when it
    /// reads zero, so `divisor - 1` yields exactly `divisor` ticks.
    #[inline]
    pub const fn bit_countdown(self) -> u32 {
        self.divisor - 1
    }

    /// Countdown from a start edge to the center of the first data bit.
    ///
    /// At most `1.5 * MAX_BAUD_DIVISOR`, well inside `u32`.
    #[inline]
    pub const fn first_sample_countdown(self) -> u32 {
        self.divisor + self.divisor / 2 - 1
    }
}

impl Default for BaudConfig {
    fn default() -> Self {
        Self {
            divisor: crate::common::constants::DEFAULT_BAUD_DIVISOR,
        }
    }
}
