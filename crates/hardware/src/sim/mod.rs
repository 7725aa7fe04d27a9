//! Simulation harness.
//!
//! Provides the clock-driving testbench that connects a device model to the serial
//! line model, the device interface it clocks, and waveform tracing of the UART pins.

/// Device-under-test interface and bundled software devices.
pub mod device;
/// Clock-driving testbench.
pub mod testbench;
/// VCD waveform output.
pub mod trace;

pub use device::{LineDevice, Loopback, ScriptedDevice};
pub use testbench::{HaltReason, RunSummary, Testbench};
pub use trace::VcdTrace;
