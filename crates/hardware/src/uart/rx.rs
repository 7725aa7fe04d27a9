//! Receive state machine.
//!
//! Decodes the device's transmit line into bytes. The machine leaves `Idle` on the
//! first low level it sees, waits one and a half bit periods to land in the middle of
//! data bit 0, then samples once per bit period. After the eighth sample it waits one
//! more bit period (into the stop bit) before announcing the byte and returning to
//! `Idle`. Low levels seen mid-frame are ignored; there is no resynchronization.

use crate::common::constants::{DATA_BITS, LINE_IDLE, LINE_START};
use crate::uart::baud::BaudConfig;

/// State of the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveState {
    /// Waiting for a start bit. No partial byte is held.
    #[default]
    Idle,
    /// Inside a frame.
    Receiving {
        /// Ticks left before the next sample point.
        ticks_remaining: u32,
        /// Data bits sampled so far, in `0..=8`.
        bits_received: u32,
        /// Sampled bits, shifted in from the high end so the first bit ends up in bit 0.
        shift_register: u8,
        /// Bit timing captured when the start edge was seen.
        baud: BaudConfig,
    },
}

impl ReceiveState {
    /// Returns true while no frame is in progress.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Outcome of one receiver tick, reported to the line model for delivery and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxEvent {
    /// Nothing externally visible happened.
    Quiet,
    /// A falling edge arrived while a frame was already in progress and was ignored.
    IgnoredEdge,
    /// A complete byte was decoded.
    Byte(u8),
}

/// The receiving half of the line model.
#[derive(Debug, Clone, Default)]
pub struct Receiver {
    state: ReceiveState,
    /// Line level seen on the previous tick, for edge bookkeeping only.
    last_level: Option<bool>,
}

impl Receiver {
    /// Creates an idle receiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub const fn state(&self) -> &ReceiveState {
        &self.state
    }

    /// Advances the receiver by one clock tick.
    ///
    /// # Arguments
    ///
    /// * `level` - The device's transmit line on this tick.
    /// * `baud` - The current baud setting; only read when a new frame starts.
    pub fn tick(&mut self, level: bool, baud: BaudConfig) -> RxEvent {
        let falling_edge = self.last_level == Some(LINE_IDLE) && level == LINE_START;
        self.last_level = Some(level);

        match &mut self.state {
            ReceiveState::Idle => {
                if level == LINE_START {
                    tracing::trace!(divisor = baud.divisor(), "rx start bit");
                    self.state = ReceiveState::Receiving {
                        ticks_remaining: baud.first_sample_countdown(),
                        bits_received: 0,
                        shift_register: 0,
                        baud,
                    };
                }
                RxEvent::Quiet
            }
            ReceiveState::Receiving {
                ticks_remaining,
                bits_received,
                shift_register,
                baud: frame_baud,
            } => {
                if *ticks_remaining > 0 {
                    *ticks_remaining -= 1;
                } else if *bits_received >= DATA_BITS {
                    let byte = *shift_register;
                    self.state = ReceiveState::Idle;
                    return RxEvent::Byte(byte);
                } else {
                    let bit = if level { 0x80 } else { 0 };
                    *shift_register = bit | (*shift_register >> 1);
                    *bits_received += 1;
                    *ticks_remaining = frame_baud.bit_countdown();
                    tracing::trace!(bit = level, index = *bits_received - 1, "rx sample");
                }

                if falling_edge {
                    RxEvent::IgnoredEdge
                } else {
                    RxEvent::Quiet
                }
            }
        }
    }
}
