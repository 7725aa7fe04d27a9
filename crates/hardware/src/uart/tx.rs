//! Transmit state machine.
//!
//! Serializes operator characters onto the device's receive line. A frame is packed
//! into one word with the start bit in bit 0, data bits 1..=8 (LSB first), and ones
//! above; each bit boundary shifts the word right and the line level is always the
//! low bit. The start bit goes out on the same tick the character is accepted.

use crate::common::constants::{DATA_BITS, LINE_IDLE, START_BITS};
use crate::uart::baud::BaudConfig;

/// State of the transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmitState {
    /// Line parked at the idle level, polling for the next character.
    #[default]
    Idle,
    /// Shifting a frame out.
    Sending {
        /// Ticks left before the next bit boundary.
        ticks_remaining: u32,
        /// Remaining frame, least significant unsent bit first.
        frame_bits: u32,
        /// Bits left to shift out; zero is terminal.
        remaining_bit_count: u32,
        /// Bit timing captured when the frame started.
        baud: BaudConfig,
    },
}

impl TransmitState {
    /// Returns true while no frame is in progress.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Line level driven in this state.
    pub const fn level(&self) -> bool {
        match self {
            Self::Idle => LINE_IDLE,
            Self::Sending { frame_bits, .. } => *frame_bits & 1 != 0,
        }
    }
}

/// Packs `byte` into a frame word: start bit, eight data bits, then stop level upward.
pub const fn encode_frame(byte: u8) -> u32 {
    (u32::MAX << (START_BITS + DATA_BITS)) | ((byte as u32) << START_BITS)
}

/// Number of bit periods in a frame with `stop_bits` stop bits.
pub const fn frame_bit_count(stop_bits: u8) -> u32 {
    START_BITS + DATA_BITS + stop_bits as u32
}

/// The transmitting half of the line model.
#[derive(Debug, Clone)]
pub struct Transmitter {
    state: TransmitState,
    stop_bits: u8,
}

impl Transmitter {
    /// Creates an idle transmitter framing with `stop_bits` stop bits.
    pub const fn new(stop_bits: u8) -> Self {
        Self {
            state: TransmitState::Idle,
            stop_bits,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &TransmitState {
        &self.state
    }

    /// Number of stop bits appended to each frame.
    pub const fn stop_bits(&self) -> u8 {
        self.stop_bits
    }

    /// Changes the stop bit count for frames loaded from now on.
    pub const fn set_stop_bits(&mut self, stop_bits: u8) {
        self.stop_bits = stop_bits;
    }

    /// Returns true if the transmitter can accept a character this tick.
    pub const fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Starts a frame for `byte`. The caller only does this while idle.
    pub fn load(&mut self, byte: u8, baud: BaudConfig) {
        tracing::trace!(byte, divisor = baud.divisor(), "tx frame start");
        self.state = TransmitState::Sending {
            ticks_remaining: baud.bit_countdown(),
            frame_bits: encode_frame(byte),
            remaining_bit_count: frame_bit_count(self.stop_bits),
            baud,
        };
    }

    /// Advances an in-progress frame by one clock tick.
    ///
    /// Returns true if the frame finished on this tick.
    pub fn advance(&mut self) -> bool {
        let TransmitState::Sending {
            ticks_remaining,
            frame_bits,
            remaining_bit_count,
            baud,
        } = &mut self.state
        else {
            return false;
        };

        if *ticks_remaining > 0 {
            *ticks_remaining -= 1;
            return false;
        }

        *frame_bits >>= 1;
        *remaining_bit_count -= 1;
        if *remaining_bit_count == 0 {
            self.state = TransmitState::Idle;
            return true;
        }
        *ticks_remaining = baud.bit_countdown();
        false
    }

    /// Level currently driven onto the line.
    pub const fn level(&self) -> bool {
        self.state.level()
    }
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new(crate::common::constants::DEFAULT_STOP_BITS)
    }
}
