//! Common utilities and types used throughout the serial line simulator.
//!
//! This module provides the building blocks shared by the line model and the testbench:
//! 1. **Constants:** Frame layout, line levels, and setup register masks.
//! 2. **Error Handling:** Configuration and simulation error types.

/// Serial framing constants.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{DATA_BITS, LINE_IDLE, LINE_START};
pub use error::{ConfigError, SimError};
