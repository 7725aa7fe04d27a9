//! Testbench tests.
//!
//! Clocks the bundled devices against a line model with scripted operator input and
//! checks what reaches the console and why each run stops.

use std::collections::VecDeque;

use pretty_assertions::assert_eq;
use uartsim_core::UartSim;
use uartsim_core::common::{ConfigError, SimError};
use uartsim_core::config::SimConfig;
use uartsim_core::sim::{HaltReason, Loopback, ScriptedDevice, Testbench};
use uartsim_core::uart::NoInput;

use crate::common::harness::{ScriptedUart, init_tracing};

fn budget(max_ticks: u64) -> SimConfig {
    SimConfig {
        max_ticks,
        ..SimConfig::default()
    }
}

fn operator(divisor: u32, input: &[u8]) -> ScriptedUart {
    init_tracing();
    UartSim::new(divisor, input.iter().copied().collect::<VecDeque<u8>>(), Vec::new()).unwrap()
}

#[test]
fn loopback_echoes_operator_input() {
    let mut bench = Testbench::new(Loopback::new(4), operator(25, b"hi"), &budget(100)).unwrap();
    let summary = bench.run().unwrap();

    assert_eq!(summary.halt, HaltReason::TickBudget);
    assert_eq!(summary.ticks, 100);
    assert_eq!(bench.uart.sink(), b"hi");
}

#[test]
fn setup_register_programs_line_model() {
    let bench = Testbench::new(Loopback::new(0x0300_0009), operator(25, b""), &budget(1)).unwrap();
    assert_eq!(bench.uart.divisor(), 9);
}

#[test]
fn zero_setup_register_rejected() {
    let result = Testbench::new(Loopback::new(0x0100_0000), operator(25, b""), &budget(1));
    assert!(matches!(
        result,
        Err(SimError::Config(ConfigError::ZeroDivisor))
    ));
}

#[test]
fn scripted_device_reaches_console() {
    let device = ScriptedDevice::new(3, b"ok\n".to_vec()).unwrap();
    let mut bench = Testbench::new(device, operator(3, b""), &SimConfig::default()).unwrap();
    let summary = bench.run().unwrap();

    assert_eq!(summary.halt, HaltReason::DeviceHalted);
    assert!(summary.ticks < SimConfig::default().max_ticks);
    assert_eq!(bench.uart.sink(), b"ok\r\n");
    assert_eq!(bench.uart.stats().newlines_translated, 1);
}

#[test]
fn operator_input_reaches_scripted_device() {
    let device = ScriptedDevice::new(2, b"0123456789".to_vec()).unwrap();
    let mut bench = Testbench::new(device, operator(2, b"AB"), &SimConfig::default()).unwrap();
    let summary = bench.run().unwrap();

    assert_eq!(summary.halt, HaltReason::DeviceHalted);
    assert_eq!(bench.device.received(), b"AB");
    assert_eq!(bench.uart.sink(), b"0123456789");
}

#[test]
fn quiet_line_ends_run() {
    let config = SimConfig {
        max_ticks: 1000,
        idle_ticks_to_halt: Some(10),
        ..SimConfig::default()
    };
    let mut bench = Testbench::new(Loopback::new(2), operator(2, b"a"), &config).unwrap();
    let summary = bench.run().unwrap();

    assert_eq!(summary.halt, HaltReason::LineIdle);
    assert!(summary.ticks < 50, "stopped at {}", summary.ticks);
    assert_eq!(bench.uart.sink(), b"a");
}

#[test]
fn quiet_line_needs_a_frame_first() {
    let config = SimConfig {
        max_ticks: 500,
        idle_ticks_to_halt: Some(10),
        ..SimConfig::default()
    };
    init_tracing();
    let uart = UartSim::new(4, NoInput, Vec::new()).unwrap();
    let mut bench = Testbench::new(Loopback::new(4), uart, &config).unwrap();
    let summary = bench.run().unwrap();

    assert_eq!(summary.halt, HaltReason::TickBudget);
    assert_eq!(summary.ticks, 500);
    assert_eq!(bench.uart.stats().ticks, 500);
}

#[test]
fn step_advances_one_tick() {
    let mut bench = Testbench::new(Loopback::new(4), operator(4, b"z"), &budget(10)).unwrap();
    bench.step().unwrap();
    bench.step().unwrap();
    assert_eq!(bench.ticks(), 2);
    assert_eq!(bench.uart.stats().ticks, 2);
}

#[test]
fn halt_reason_display() {
    assert_eq!(HaltReason::DeviceHalted.to_string(), "device halted");
    assert_eq!(HaltReason::LineIdle.to_string(), "line idle");
    assert_eq!(HaltReason::TickBudget.to_string(), "tick budget exhausted");
}

#[test]
fn device_can_report_a_different_divisor() {
    let device = ScriptedDevice::new(4, b"ok".to_vec())
        .unwrap()
        .with_setup_register(8);
    let bench = Testbench::new(device, operator(25, b""), &budget(1)).unwrap();
    assert_eq!(bench.uart.divisor(), 8);
}

#[test]
fn scripted_device_reports_its_own_divisor_by_default() {
    let device = ScriptedDevice::new(4, b"ok".to_vec()).unwrap();
    let bench = Testbench::new(device, operator(25, b""), &budget(1)).unwrap();
    assert_eq!(bench.uart.divisor(), 4);
}
