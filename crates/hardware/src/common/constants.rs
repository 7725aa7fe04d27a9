//! Serial Framing Constants.
//!
//! This module defines the constants of the asynchronous serial line. It includes:
//! 1. **Frame Layout:** Start, data, and stop bit counts.
//! 2. **Line Levels:** The idle (mark) and start (space) levels.
//! 3. **Setup Register:** The mask applied to the divisor reported by the device.
//! 4. **Console Convention:** Bytes involved in the LF to CRLF translation.

/// Number of data bits per frame (always 8, no parity).
pub const DATA_BITS: u32 = 8;

/// Number of start bits per frame.
pub const START_BITS: u32 = 1;

/// Default number of stop bits per frame.
pub const DEFAULT_STOP_BITS: u8 = 1;

/// Largest supported number of stop bits per frame.
pub const MAX_STOP_BITS: u8 = 2;

/// Line level while idle (mark). Also the level of every stop bit.
pub const LINE_IDLE: bool = true;

/// Line level of the start bit (space).
pub const LINE_START: bool = false;

/// Mask selecting the baud divisor out of the device's setup register.
///
/// The upper byte of the register carries framing options that this model ignores.
pub const SETUP_DIVISOR_MASK: u32 = 0x00FF_FFFF;

/// Largest baud divisor; the setup register's divisor field is 24 bits wide.
pub const MAX_BAUD_DIVISOR: u32 = SETUP_DIVISOR_MASK;

/// Line feed; the receiver precedes it with [`CARRIAGE_RETURN`] on the console.
pub const LINE_FEED: u8 = b'\n';

/// Carriage return.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Default baud divisor (one bit every 25 clocks).
pub const DEFAULT_BAUD_DIVISOR: u32 = 25;
