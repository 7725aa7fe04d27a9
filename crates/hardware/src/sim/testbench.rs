//! Testbench: owns the device under test and the serial line model side-by-side.
//!
//! Each clock the device's transmit pin is handed to the line model, and the level the
//! line model returns is applied to the device's receive pin on the same edge. The run
//! ends when the device halts, the line has gone quiet (if configured), or the tick
//! budget is spent.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::error::SimError;
use crate::config::SimConfig;
use crate::sim::device::LineDevice;
use crate::sim::trace::VcdTrace;
use crate::uart::{ByteSink, CharSource, UartSim};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The device reported that it halted.
    DeviceHalted,
    /// Both directions stayed idle for the configured number of ticks.
    LineIdle,
    /// The tick budget ran out.
    TickBudget,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceHalted => write!(f, "device halted"),
            Self::LineIdle => write!(f, "line idle"),
            Self::TickBudget => write!(f, "tick budget exhausted"),
        }
    }
}

/// Result of [`Testbench::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Clock ticks executed.
    pub ticks: u64,
    /// Why the run stopped.
    pub halt: HaltReason,
}

/// Clock driver for a device and its serial line model.
pub struct Testbench<D, S, K> {
    /// Device under test.
    pub device: D,
    /// Serial line model attached to the device's UART pins.
    pub uart: UartSim<S, K>,
    ticks: u64,
    max_ticks: u64,
    idle_ticks_to_halt: Option<u64>,
    /// Tick of the most recent line activity.
    last_activity: u64,
    trace: Option<VcdTrace<Box<dyn Write>>>,
}

impl<D: LineDevice, S: CharSource, K: ByteSink> Testbench<D, S, K> {
    /// Creates a testbench and programs the line model from the device's setup register.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the device reports a zero divisor, or
    /// [`SimError::Trace`] if `config.trace_path` cannot be created.
    pub fn new(device: D, mut uart: UartSim<S, K>, config: &SimConfig) -> Result<Self, SimError> {
        uart.setup_register(device.setup_register())?;
        tracing::info!(
            device = device.name(),
            divisor = uart.divisor(),
            max_ticks = config.max_ticks,
            "testbench ready"
        );

        let mut bench = Self {
            device,
            uart,
            ticks: 0,
            max_ticks: config.max_ticks,
            idle_ticks_to_halt: config.idle_ticks_to_halt,
            last_activity: 0,
            trace: None,
        };
        if let Some(path) = &config.trace_path {
            bench.open_trace(path)?;
        }
        Ok(bench)
    }

    /// Starts writing a VCD waveform to `path`, replacing any open trace.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if the file cannot be created or written.
    pub fn open_trace(&mut self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let file = File::create(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened waveform trace");
        self.with_trace(Box::new(BufWriter::new(file)))
    }

    /// Starts writing a VCD waveform to `out`, replacing any open trace.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if the header cannot be written.
    pub fn with_trace(&mut self, out: Box<dyn Write>) -> Result<(), SimError> {
        self.close_trace()?;
        self.trace = Some(VcdTrace::new(out)?);
        Ok(())
    }

    /// Finishes and flushes the open trace, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if the final flush fails.
    pub fn close_trace(&mut self) -> Result<(), SimError> {
        if let Some(mut trace) = self.trace.take() {
            trace.finish(self.ticks)?;
        }
        Ok(())
    }

    /// Advances the device and the line model by one clock tick.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if the waveform sample cannot be written.
    pub fn step(&mut self) -> Result<(), SimError> {
        let tx = self.device.tx();
        let rx = self.uart.tick(tx);
        let _next_tx = self.device.clock(rx);

        if let Some(trace) = &mut self.trace {
            trace.sample(self.ticks, tx, rx)?;
        }

        let busy = !self.uart.rx_state().is_idle() || !self.uart.tx_state().is_idle();
        if busy || !tx || !rx {
            self.last_activity = self.ticks;
        }
        self.ticks += 1;
        Ok(())
    }

    /// Runs until the device halts, the line goes idle, or the tick budget is spent.
    ///
    /// The open trace, if any, is finished before returning.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if writing the waveform fails.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let halt = loop {
            if self.device.halted() {
                break HaltReason::DeviceHalted;
            }
            if self.line_idle() {
                break HaltReason::LineIdle;
            }
            if self.ticks >= self.max_ticks {
                break HaltReason::TickBudget;
            }
            self.step()?;
        };
        self.close_trace()?;

        tracing::info!(ticks = self.ticks, %halt, "run finished");
        Ok(RunSummary {
            ticks: self.ticks,
            halt,
        })
    }

    /// Clock ticks executed so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    fn line_idle(&self) -> bool {
        let Some(limit) = self.idle_ticks_to_halt else {
            return false;
        };
        self.uart.stats().frames_received > 0 && self.ticks - self.last_activity > limit
    }
}

impl<D: fmt::Debug, S: fmt::Debug, K: fmt::Debug> fmt::Debug for Testbench<D, S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Testbench")
            .field("device", &self.device)
            .field("uart", &self.uart)
            .field("ticks", &self.ticks)
            .field("max_ticks", &self.max_ticks)
            .field("tracing", &self.trace.is_some())
            .finish()
    }
}
