//! Serial line model (UART simulator).
//!
//! Stands in for the peripheral on the far end of a device's UART pins while the device
//! is clocked by a cycle-by-cycle simulation. It contains:
//! 1. **Baud Configuration:** Ticks per bit period, shared by both directions.
//! 2. **Receiver:** Decodes the device's transmit line into bytes for a [`ByteSink`].
//! 3. **Transmitter:** Encodes characters from a [`CharSource`] onto the device's receive line.
//!
//! The frame format is one start bit, eight data bits LSB first, one or two stop bits,
//! and no parity. [`UartSim::tick`] must be called exactly once per simulated clock.

/// Ticks-per-bit configuration.
pub mod baud;
/// Operator input and console output capabilities.
pub mod io;
/// Receive state machine.
pub mod rx;
/// Transmit state machine.
pub mod tx;

use crate::common::constants::{
    CARRIAGE_RETURN, DEFAULT_STOP_BITS, LINE_FEED, LINE_IDLE, LINE_START, MAX_STOP_BITS,
};
use crate::common::error::ConfigError;
use crate::stats::LineStats;

pub use baud::BaudConfig;
pub use io::{ByteSink, CharSource, ConsoleSink, NoInput, StdinSource};
pub use rx::{ReceiveState, Receiver, RxEvent};
pub use tx::{TransmitState, Transmitter};

/// The serial line model.
///
/// Owns both state machines, the baud setting, and the two I/O capabilities.
#[derive(Debug)]
pub struct UartSim<S, K> {
    baud: BaudConfig,
    rx: Receiver,
    tx: Transmitter,
    source: S,
    sink: K,
    stats: LineStats,
}

impl<S: CharSource, K: ByteSink> UartSim<S, K> {
    /// Creates a line model with both directions idle.
    ///
    /// # Arguments
    ///
    /// * `divisor` - Simulation clock ticks per bit period.
    /// * `source` - Operator characters to transmit to the device.
    /// * `sink` - Receives bytes decoded from the device.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] if `divisor` is zero, or
    /// [`ConfigError::DivisorTooLarge`] if it exceeds the 24-bit setup field.
    pub fn new(divisor: u32, source: S, sink: K) -> Result<Self, ConfigError> {
        Ok(Self {
            baud: BaudConfig::new(divisor)?,
            rx: Receiver::new(),
            tx: Transmitter::new(DEFAULT_STOP_BITS),
            source,
            sink,
            stats: LineStats::default(),
        })
    }

    /// Sets the number of stop bits appended to transmitted frames.
    ///
    /// A frame already in flight keeps the length it started with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStopBits`] unless `stop_bits` is 1 or 2.
    pub fn with_stop_bits(mut self, stop_bits: u8) -> Result<Self, ConfigError> {
        if !(1..=MAX_STOP_BITS).contains(&stop_bits) {
            return Err(ConfigError::InvalidStopBits(stop_bits));
        }
        self.tx.set_stop_bits(stop_bits);
        Ok(self)
    }

    /// Changes the bit period. Frames already in flight keep their captured timing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] or [`ConfigError::DivisorTooLarge`] for an
    /// unusable divisor; the old setting is kept.
    pub fn setup(&mut self, divisor: u32) -> Result<(), ConfigError> {
        self.baud = BaudConfig::new(divisor)?;
        tracing::info!(divisor, "uart baud divisor set");
        Ok(())
    }

    /// Changes the bit period from the device's raw setup register value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDivisor`] if the divisor field is zero.
    pub fn setup_register(&mut self, raw: u32) -> Result<(), ConfigError> {
        self.baud = BaudConfig::from_setup_register(raw)?;
        tracing::info!(
            raw = format_args!("{raw:#010x}"),
            divisor = self.baud.divisor(),
            "uart setup register applied"
        );
        Ok(())
    }

    /// Advances both directions by one clock tick.
    ///
    /// # Arguments
    ///
    /// * `device_tx` - Level of the device's transmit pin on this tick (true = 1).
    ///
    /// # Returns
    ///
    /// The level to drive onto the device's receive pin.
    pub fn tick(&mut self, device_tx: bool) -> bool {
        self.stats.ticks += 1;
        self.tick_rx(device_tx);
        self.tick_tx()
    }

    fn tick_rx(&mut self, level: bool) {
        match self.rx.tick(level, self.baud) {
            RxEvent::Quiet => {}
            RxEvent::IgnoredEdge => self.stats.edges_ignored += 1,
            RxEvent::Byte(byte) => {
                tracing::debug!(byte = format_args!("{byte:#04x}"), "rx frame complete");
                if byte == LINE_FEED {
                    self.sink.write_byte(CARRIAGE_RETURN);
                    self.stats.newlines_translated += 1;
                }
                self.sink.write_byte(byte);
                self.sink.flush();
                self.stats.frames_received += 1;
            }
        }
    }

    fn tick_tx(&mut self) -> bool {
        if self.tx.is_idle() {
            if let Some(byte) = self.source.try_read() {
                self.tx.load(byte, self.baud);
                return LINE_START;
            }
            return LINE_IDLE;
        }
        if self.tx.advance() {
            self.stats.frames_sent += 1;
            tracing::debug!("tx frame complete");
        }
        self.tx.level()
    }
}

impl<S, K> UartSim<S, K> {
    /// Current ticks per bit period.
    pub const fn divisor(&self) -> u32 {
        self.baud.divisor()
    }

    /// Current baud setting.
    pub const fn baud(&self) -> BaudConfig {
        self.baud
    }

    /// Receiver state.
    pub const fn rx_state(&self) -> &ReceiveState {
        self.rx.state()
    }

    /// Transmitter state.
    pub const fn tx_state(&self) -> &TransmitState {
        self.tx.state()
    }

    /// Stop bits appended to transmitted frames.
    pub const fn stop_bits(&self) -> u8 {
        self.tx.stop_bits()
    }

    /// Diagnostic counters.
    pub const fn stats(&self) -> &LineStats {
        &self.stats
    }

    /// The output sink.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutable access to the output sink.
    pub const fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Mutable access to the operator source, e.g. to queue more scripted input.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Tears the model down, returning its source and sink.
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }
}
