//! Serial line simulator CLI.
//!
//! This binary clocks a software device against the UART line model. It provides:
//! 1. **Run:** A scripted device transmits a message; operator keystrokes from stdin are
//!    serialized onto its receive pin and the decoded output is shown on the console.
//! 2. **Loopback:** The device echoes its receive pin, so typed characters come back.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uartsim_core::config::Config;
use uartsim_core::sim::{LineDevice, Loopback, ScriptedDevice, Testbench};
use uartsim_core::uart::{ConsoleSink, StdinSource, UartSim};

/// Message sent by the scripted device when none is given.
const DEFAULT_MESSAGE: &str = "x<y\n";

#[derive(Parser, Debug)]
#[command(
    name = "uartsim",
    author,
    version,
    about = "Cycle-accurate UART line model",
    long_about = "Clock a device model against the UART line model.\n\nExamples:\n  uartsim run --message 'hello\\n' --divisor 8\n  uartsim run --config line.json --trace line.vcd\n  uartsim loopback --divisor 4 --max-ticks 1000000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted device that transmits a message.
    Run {
        #[command(flatten)]
        line: LineArgs,

        /// Message the device transmits (escapes: \n, \r, \t, \\).
        #[arg(short, long, default_value = DEFAULT_MESSAGE)]
        message: String,

        /// Device bit period in ticks, if it differs from the line model's `--divisor`.
        #[arg(long)]
        device_divisor: Option<u32>,
    },

    /// Echo the line model's output back into it.
    Loopback {
        #[command(flatten)]
        line: LineArgs,
    },
}

/// Options shared by every subcommand; each overrides the matching config field.
#[derive(Args, Debug)]
struct LineArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation clock ticks per bit period.
    #[arg(short, long)]
    divisor: Option<u32>,

    /// Stop bits per transmitted frame (1 or 2).
    #[arg(long)]
    stop_bits: Option<u8>,

    /// Clock ticks to run before stopping.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write a VCD waveform of the UART pins.
    #[arg(short, long)]
    trace: Option<String>,

    /// Write decoded output to stderr instead of stdout.
    #[arg(long)]
    stderr: bool,
}

impl LineArgs {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(divisor) = self.divisor {
            config.uart.baud_divisor = divisor;
        }
        if let Some(stop_bits) = self.stop_bits {
            config.uart.stop_bits = stop_bits;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.sim.max_ticks = max_ticks;
        }
        if self.trace.is_some() {
            config.sim.trace_path.clone_from(&self.trace);
        }
        config.uart.output_to_stderr |= self.stderr;
        config.validate()?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            line,
            message,
            device_divisor,
        } => cmd_run(&line, &message, device_divisor),
        Commands::Loopback { line } => cmd_loopback(&line),
    };

    if let Err(e) = result {
        eprintln!("\n[!] {e:#}");
        process::exit(1);
    }
}

/// Runs a scripted device sending `message` until it halts or the budget is spent.
fn cmd_run(line: &LineArgs, message: &str, device_divisor: Option<u32>) -> Result<()> {
    let config = line.resolve()?;
    let divisor = device_divisor.unwrap_or(config.uart.baud_divisor);
    let bytes = unescape(message);
    println!("[*] Scripted device: {} bytes at {divisor} ticks/bit", bytes.len());

    let device = ScriptedDevice::new(divisor, bytes)
        .context("building scripted device")?
        .with_setup_register(config.uart.baud_divisor);
    let bench = simulate(device, &config)?;

    let received = bench.device.received();
    if !received.is_empty() {
        eprintln!(
            "[*] Device received {} bytes: {:?}",
            received.len(),
            String::from_utf8_lossy(received)
        );
    }
    Ok(())
}

/// Runs the loopback device until the tick budget is spent.
fn cmd_loopback(line: &LineArgs) -> Result<()> {
    let config = line.resolve()?;
    println!("[*] Loopback at {} ticks/bit; type to echo", config.uart.baud_divisor);
    let _bench = simulate(Loopback::new(config.uart.baud_divisor), &config)?;
    Ok(())
}

/// Clocks `device` against a console-attached line model and prints statistics.
fn simulate<D: LineDevice>(
    device: D,
    config: &Config,
) -> Result<Testbench<D, StdinSource, ConsoleSink>> {
    let uart = UartSim::new(
        config.uart.baud_divisor,
        StdinSource::spawn(),
        ConsoleSink::new(config.uart.output_to_stderr),
    )?
    .with_stop_bits(config.uart.stop_bits)?;

    let mut bench = Testbench::new(device, uart, &config.sim).context("starting testbench")?;
    let summary = bench.run().context("running testbench")?;

    eprintln!("\n[*] Stopped after {} ticks: {}", summary.ticks, summary.halt);
    bench.uart.stats().print();
    Ok(bench)
}

/// Expands the backslash escapes accepted by `--message`.
fn unescape(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('r') => out.push(b'\r'),
            Some('t') => out.push(b'\t'),
            Some('\\') | None => out.push(b'\\'),
            Some(other) => {
                out.push(b'\\');
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out
}
