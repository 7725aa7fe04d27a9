//! Serial line simulator library.
//!
//! This crate models the far end of a device's UART pins for cycle-by-cycle hardware
//! simulation:
//! 1. **UART:** The serial line model, a pair of receive and transmit state machines
//!    clocked once per simulation tick, with pluggable operator input and console output.
//! 2. **Simulation:** A testbench that clocks a device model against the line model,
//!    with optional VCD waveform tracing.
//! 3. **Configuration:** JSON-loadable line and testbench settings.
//! 4. **Statistics:** Diagnostic frame and edge counters.

/// Common types and constants (framing constants, errors).
pub mod common;
/// Simulator configuration (defaults and serde structures).
pub mod config;
/// Testbench, device interface, and waveform tracing.
pub mod sim;
/// Line statistics collection and reporting.
pub mod stats;
/// Serial line model (baud, receiver, transmitter, I/O capabilities).
pub mod uart;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Clock driver for a device and its line model.
pub use crate::sim::Testbench;
/// The serial line model.
pub use crate::uart::UartSim;
