//! Operator source and console sink tests.
//!
//! Uses `mockall` doubles to pin down exactly when the model polls for input
//! and how it writes and flushes decoded output.

use std::collections::VecDeque;

use mockall::Sequence;
use mockall::predicate::eq;
use uartsim_core::UartSim;
use uartsim_core::uart::{ByteSink, CharSource, ConsoleSink, NoInput};

use crate::common::harness::{drive, frame_levels, idle, message_levels};
use crate::common::mocks::line_io::{MockSink, MockSource};

#[test]
fn scripted_queue_source_pops_in_order() {
    let mut source: VecDeque<u8> = b"ab".iter().copied().collect();
    assert_eq!(source.try_read(), Some(b'a'));
    assert_eq!(source.try_read(), Some(b'b'));
    assert_eq!(source.try_read(), None);
}

#[test]
fn closure_source() {
    let mut next = Some(b'z');
    let mut source = move || next.take();
    assert_eq!(source.try_read(), Some(b'z'));
    assert_eq!(source.try_read(), None);
}

#[test]
fn no_input_source_is_always_empty() {
    let mut source = NoInput;
    assert!((0..100).all(|_| source.try_read().is_none()));
}

#[test]
fn vec_sink_collects() {
    let mut sink = Vec::new();
    sink.write_byte(1);
    sink.write_byte(2);
    sink.flush();
    assert_eq!(sink, vec![1, 2]);
}

#[test]
fn boxed_sink_forwards() {
    let mut sink: Box<Vec<u8>> = Box::default();
    ByteSink::write_byte(&mut sink, 7);
    assert_eq!(*sink, vec![7]);
}

#[test]
fn source_polled_only_while_transmitter_idle() {
    // Divisor 1: tick 0 accepts 'A', ticks 1..=10 shift the frame out (the last one
    // retires it without polling), then ticks 11 and 12 poll again.
    let mut source = MockSource::new();
    let mut calls = 0;
    let _ = source.expect_try_read().times(3).returning(move || {
        calls += 1;
        (calls == 1).then_some(b'A')
    });

    let mut uart = UartSim::new(1, source, Vec::new()).unwrap();
    let out = drive(&mut uart, &idle(13));
    let mut expected = frame_levels(b'A', 1, 1);
    expected.extend(idle(3));
    assert_eq!(out, expected);
}

#[test]
fn sink_gets_cr_then_lf_then_flush() {
    let mut sink = MockSink::new();
    let mut seq = Sequence::new();
    let _ = sink
        .expect_write_byte()
        .with(eq(b'\r'))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = sink
        .expect_write_byte()
        .with(eq(b'\n'))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    let _ = sink
        .expect_flush()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut uart = UartSim::new(3, NoInput, sink).unwrap();
    let mut levels = frame_levels(b'\n', 3, 1);
    levels.extend(idle(3));
    let _ = drive(&mut uart, &levels);
}

#[test]
fn sink_flushed_after_every_byte() {
    let mut sink = MockSink::new();
    let _ = sink.expect_write_byte().times(4).return_const(());
    let _ = sink.expect_flush().times(4).return_const(());

    let mut uart = UartSim::new(2, NoInput, sink).unwrap();
    let mut levels = message_levels(b"four", 2);
    levels.extend(idle(4));
    let _ = drive(&mut uart, &levels);
}

#[test]
fn into_parts_returns_collaborators() {
    let mut uart = UartSim::new(1, VecDeque::from(vec![b'x']), Vec::new()).unwrap();
    let _ = drive(&mut uart, &message_levels(b"y", 1));
    let _ = drive(&mut uart, &idle(2));
    let (source, sink) = uart.into_parts();
    assert!(source.is_empty());
    assert_eq!(sink, vec![b'y']);
}

#[test]
fn console_sink_writes_to_stderr() {
    let mut sink = ConsoleSink::new(true);
    for &byte in b"console ok\r\n" {
        sink.write_byte(byte);
    }
    sink.flush();
    assert!(!sink.has_failed());
}
