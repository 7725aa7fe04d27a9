//! Device-under-test interface.
//!
//! This module defines the `LineDevice` trait through which the testbench clocks a
//! hardware model and reaches its UART pins. It provides:
//! 1. **Pins:** The transmit pin level before each clock and the receive pin input.
//! 2. **Configuration:** The baud setup register the device reports at start-up.
//! 3. **Lifecycle:** A halt flag that ends the run.
//!
//! Two software devices are bundled: [`Loopback`] and [`ScriptedDevice`].

use std::collections::VecDeque;

use crate::common::constants::{DEFAULT_STOP_BITS, LINE_IDLE};
use crate::common::error::ConfigError;
use crate::uart::baud::BaudConfig;
use crate::uart::rx::{Receiver, RxEvent};
use crate::uart::tx::{Transmitter, frame_bit_count};

/// A clocked hardware model with a UART transmit and receive pin.
pub trait LineDevice {
    /// Returns a short name for this device (e.g., `"loopback"`).
    fn name(&self) -> &str;

    /// Level of the transmit pin as of the last clock edge.
    fn tx(&self) -> bool;

    /// Applies one rising clock edge with `uart_rx` on the receive pin.
    ///
    /// Returns the new transmit pin level.
    fn clock(&mut self, uart_rx: bool) -> bool;

    /// Raw value of the device's UART setup register; the low 24 bits are ticks per bit.
    fn setup_register(&self) -> u32;

    /// Returns true once the device has finished and the run should stop.
    fn halted(&self) -> bool {
        false
    }
}

/// Echoes the receive pin back onto the transmit pin one clock later.
#[derive(Debug, Clone)]
pub struct Loopback {
    setup: u32,
    level: bool,
}

impl Loopback {
    /// Creates a loopback device reporting `setup` as its setup register.
    pub const fn new(setup: u32) -> Self {
        Self {
            setup,
            level: LINE_IDLE,
        }
    }
}

impl LineDevice for Loopback {
    fn name(&self) -> &str {
        "loopback"
    }

    fn tx(&self) -> bool {
        self.level
    }

    fn clock(&mut self, uart_rx: bool) -> bool {
        self.level = uart_rx;
        self.level
    }

    fn setup_register(&self) -> u32 {
        self.setup
    }
}

/// A device that transmits a fixed message and records what it receives.
///
/// Stands in for a program writing to its console port: it sends each byte of the
/// message back to back, then halts after the line has been quiet for one frame time so
/// the far end has finished decoding.
#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    baud: BaudConfig,
    message: VecDeque<u8>,
    tx: Transmitter,
    rx: Receiver,
    received: Vec<u8>,
    /// Value reported through [`LineDevice::setup_register`].
    setup: u32,
    /// Consecutive clocks with nothing left to send and the transmitter idle.
    quiet_clocks: u64,
}

impl ScriptedDevice {
    /// Creates a device that will send `message` at `divisor` ticks per bit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] or [`ConfigError::DivisorTooLarge`] for an
    /// unusable divisor.
    pub fn new(divisor: u32, message: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        Ok(Self {
            baud: BaudConfig::new(divisor)?,
            message: message.into().into(),
            tx: Transmitter::new(DEFAULT_STOP_BITS),
            rx: Receiver::new(),
            received: Vec::new(),
            setup: divisor,
            quiet_clocks: 0,
        })
    }

    /// Reports `raw` as the setup register instead of the device's own divisor.
    ///
    /// The testbench programs the line model from this value, so a mismatch between the
    /// two ends of the line can be simulated.
    #[must_use]
    pub const fn with_setup_register(mut self, raw: u32) -> Self {
        self.setup = raw;
        self
    }

    /// Bytes decoded from the device's receive pin so far.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// Bytes still waiting to be transmitted (not counting a frame in flight).
    pub fn pending(&self) -> usize {
        self.message.len()
    }

    fn drain_time(&self) -> u64 {
        u64::from(frame_bit_count(self.tx.stop_bits())) * u64::from(self.baud.divisor())
    }
}

impl LineDevice for ScriptedDevice {
    fn name(&self) -> &str {
        "scripted"
    }

    fn tx(&self) -> bool {
        self.tx.level()
    }

    fn clock(&mut self, uart_rx: bool) -> bool {
        if let RxEvent::Byte(byte) = self.rx.tick(uart_rx, self.baud) {
            self.received.push(byte);
        }

        if !self.tx.is_idle() {
            let _finished = self.tx.advance();
        } else if let Some(byte) = self.message.pop_front() {
            self.tx.load(byte, self.baud);
        }

        if self.tx.is_idle() && self.message.is_empty() {
            self.quiet_clocks += 1;
        } else {
            self.quiet_clocks = 0;
        }
        self.tx.level()
    }

    fn setup_register(&self) -> u32 {
        self.setup
    }

    fn halted(&self) -> bool {
        self.quiet_clocks > self.drain_time() && self.rx.state().is_idle()
    }
}
