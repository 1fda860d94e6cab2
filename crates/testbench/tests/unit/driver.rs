//! # Input Driver Tests
//!
//! Handshake shapes on the `start` pin and lifecycle misuse.

use fpmul_tb::TestbenchError;
use fpmul_tb::dut::Pins;
use fpmul_tb::float::FloatValue;
use fpmul_tb::tb::{InputDriver, StartProtocol};
use pretty_assertions::assert_eq;

fn pair(a: f32, b: f32) -> (FloatValue, FloatValue) {
    (FloatValue::from_f32(a), FloatValue::from_f32(b))
}

/// Records `start` over `cycles`, raising `done` on the cycles listed.
fn trace_start(drv: &mut InputDriver, cycles: u64, done_at: &[u64]) -> Vec<bool> {
    let mut pins = Pins::default();
    (0..cycles)
        .map(|cycle| {
            pins.done = done_at.contains(&cycle);
            drv.drive(&mut pins, cycle);
            pins.start
        })
        .collect()
}

#[test]
fn test_pulse_back_to_back_with_pipelining() {
    let mut drv = InputDriver::new(StartProtocol::Pulse, 4, 16);
    for _ in 0..3 {
        let (a, b) = pair(1.0, 2.0);
        drv.enqueue(a, b).unwrap();
    }
    drv.start().unwrap();
    let starts = trace_start(&mut drv, 7, &[]);
    assert_eq!(starts, vec![true, false, true, false, true, false, false]);
    assert_eq!(drv.in_flight(), 3);
}

#[test]
fn test_operands_are_driven_with_start() {
    let mut drv = InputDriver::new(StartProtocol::Pulse, 1, 16);
    let (a, b) = pair(1.5, -3.0);
    drv.enqueue(a, b).unwrap();
    drv.start().unwrap();
    let mut pins = Pins::default();
    drv.drive(&mut pins, 0);
    assert_eq!(pins.a, 1.5_f32.to_bits());
    assert_eq!(pins.b, (-3.0_f32).to_bits());
    assert!(pins.start);
}

#[test]
fn test_hold_waits_for_done() {
    let mut drv = InputDriver::new(StartProtocol::Hold, 1, 16);
    for _ in 0..2 {
        let (a, b) = pair(1.0, 1.0);
        drv.enqueue(a, b).unwrap();
    }
    drv.start().unwrap();
    // `done` seen in the drive phase of cycle 3 releases start; cycle 4 starts the next.
    let starts = trace_start(&mut drv, 6, &[3]);
    assert_eq!(starts, vec![true, true, true, false, true, true]);
}

#[test]
fn test_stop_keeps_in_flight_and_drops_new_work() {
    let mut drv = InputDriver::new(StartProtocol::Hold, 1, 16);
    for _ in 0..2 {
        let (a, b) = pair(1.0, 1.0);
        drv.enqueue(a, b).unwrap();
    }
    drv.start().unwrap();
    let mut pins = Pins::default();
    drv.drive(&mut pins, 0);
    drv.stop().unwrap();
    drv.drive(&mut pins, 1);
    assert!(pins.start, "held start survives stop");
    pins.done = true;
    drv.drive(&mut pins, 2);
    pins.done = false;
    assert!(!pins.start);
    drv.drive(&mut pins, 3);
    assert!(!pins.start, "nothing new issued after stop");
    assert_eq!(drv.issued(), 1);
    assert_eq!(drv.pending(), 1);
}

#[test]
fn test_misuse_errors() {
    let mut drv = InputDriver::new(StartProtocol::Pulse, 1, 16);
    assert!(matches!(drv.stop(), Err(TestbenchError::NotStarted)));
    drv.start().unwrap();
    assert!(matches!(drv.start(), Err(TestbenchError::AlreadyStarted)));
    drv.stop().unwrap();
    assert!(matches!(drv.stop(), Err(TestbenchError::AlreadyStopped)));
    assert!(matches!(drv.start(), Err(TestbenchError::AlreadyStopped)));
}

#[test]
fn test_stray_done_is_tolerated() {
    let mut drv = InputDriver::new(StartProtocol::Pulse, 1, 16);
    drv.start().unwrap();
    let mut pins = Pins {
        done: true,
        ..Pins::default()
    };
    drv.drive(&mut pins, 0);
    assert_eq!(drv.in_flight(), 0);
    assert!(drv.is_idle());
}
