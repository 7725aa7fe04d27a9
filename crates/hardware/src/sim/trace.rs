//! Waveform tracing of the UART pins.
//!
//! Writes a Value Change Dump (IEEE 1364 VCD) with two 1-bit wires, `uart_tx` (device to
//! line model) and `uart_rx` (line model to device). One VCD time unit is one clock
//! tick, and only ticks where a wire changes are emitted.

use std::io::{self, Write};

/// VCD identifier code of the `uart_tx` wire.
const TX_ID: char = '!';
/// VCD identifier code of the `uart_rx` wire.
const RX_ID: char = '"';

/// Streaming VCD writer.
#[derive(Debug)]
pub struct VcdTrace<W: Write> {
    out: W,
    /// Levels written most recently, `None` before the first sample.
    last: Option<(bool, bool)>,
}

impl<W: Write> VcdTrace<W> {
    /// Writes the VCD header to `out` and returns the tracer.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "$version uartsim {} $end", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "$timescale 1ns $end")?;
        writeln!(out, "$scope module uartsim $end")?;
        writeln!(out, "$var wire 1 {TX_ID} uart_tx $end")?;
        writeln!(out, "$var wire 1 {RX_ID} uart_rx $end")?;
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;
        Ok(Self { out, last: None })
    }

    /// Records the pin levels seen on clock tick `tick`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn sample(&mut self, tick: u64, tx: bool, rx: bool) -> io::Result<()> {
        match self.last {
            None => {
                writeln!(self.out, "#{tick}")?;
                writeln!(self.out, "$dumpvars")?;
                writeln!(self.out, "{}{TX_ID}", u8::from(tx))?;
                writeln!(self.out, "{}{RX_ID}", u8::from(rx))?;
                writeln!(self.out, "$end")?;
            }
            Some((last_tx, last_rx)) if last_tx != tx || last_rx != rx => {
                writeln!(self.out, "#{tick}")?;
                if last_tx != tx {
                    writeln!(self.out, "{}{TX_ID}", u8::from(tx))?;
                }
                if last_rx != rx {
                    writeln!(self.out, "{}{RX_ID}", u8::from(rx))?;
                }
            }
            Some(_) => {}
        }
        self.last = Some((tx, rx));
        Ok(())
    }

    /// Marks the end time of the dump and flushes it.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the underlying writer.
    pub fn finish(&mut self, end_tick: u64) -> io::Result<()> {
        writeln!(self.out, "#{end_tick}")?;
        self.out.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
