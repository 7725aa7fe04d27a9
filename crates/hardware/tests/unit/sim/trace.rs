//! VCD waveform tests.

use std::fs;

use pretty_assertions::assert_eq;
use uartsim_core::UartSim;
use uartsim_core::config::SimConfig;
use uartsim_core::sim::{Loopback, Testbench, VcdTrace};

use crate::common::harness::scripted_uart;

#[test]
fn header_declares_both_pins() {
    let trace = VcdTrace::new(Vec::new()).unwrap();
    let text = String::from_utf8(trace.into_inner()).unwrap();

    assert!(text.starts_with("$version uartsim "));
    assert!(text.contains("$timescale 1ns $end\n"));
    assert!(text.contains("$var wire 1 ! uart_tx $end\n"));
    assert!(text.contains("$var wire 1 \" uart_rx $end\n"));
    assert!(text.ends_with("$enddefinitions $end\n"));
}

#[test]
fn only_changes_are_dumped() {
    let mut trace = VcdTrace::new(Vec::new()).unwrap();
    trace.sample(0, true, true).unwrap();
    trace.sample(1, true, true).unwrap();
    trace.sample(5, false, true).unwrap();
    trace.sample(6, false, false).unwrap();
    trace.sample(7, true, true).unwrap();
    trace.finish(9).unwrap();
    let text = String::from_utf8(trace.into_inner()).unwrap();

    let (_, body) = text.split_once("$enddefinitions $end\n").unwrap();
    assert_eq!(
        body,
        "#0\n$dumpvars\n1!\n1\"\n$end\n#5\n0!\n#6\n0\"\n#7\n1!\n1\"\n#9\n"
    );
}

#[test]
fn testbench_writes_trace_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line.vcd");
    let config = SimConfig {
        max_ticks: 60,
        trace_path: Some(path.to_string_lossy().into_owned()),
        idle_ticks_to_halt: None,
    };

    let mut bench = Testbench::new(Loopback::new(4), scripted_uart(4, b"x"), &config).unwrap();
    let _ = bench.run().unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.contains("$enddefinitions $end\n#0\n$dumpvars\n1!\n0\"\n$end\n#1\n0!\n"));
    assert!(text.ends_with("#60\n"));
}

#[test]
fn missing_trace_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimConfig {
        trace_path: Some(dir.path().join("no/such/dir/line.vcd").to_string_lossy().into_owned()),
        ..SimConfig::default()
    };
    let uart = UartSim::new(4, uartsim_core::uart::NoInput, Vec::new()).unwrap();
    let result = Testbench::new(Loopback::new(4), uart, &config);
    assert!(matches!(result, Err(uartsim_core::common::SimError::Trace(_))));
}
