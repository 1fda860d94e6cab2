//! # End-to-End Scenarios
//!
//! Directed operand sequences run through the full harness against the
//! behavioral multiplier, with and without injected faults.

use crate::common::harness::{ConfigBuilder, dut_for, init_tracing, run_bits, run_pairs};
use fpmul_tb::dut::FaultMode;
use fpmul_tb::stimulus::StimulusKind;
use fpmul_tb::tb::{MismatchReason, StartProtocol, run_test};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_zero_times_finite() {
    let report = run_pairs(&ConfigBuilder::new().build(), &[(0.0, 2.5), (-0.0, 2.5)]);
    assert!(report.passed());
    assert_eq!(report.result.passed, 2);
}

#[test]
fn test_nan_times_finite() {
    let report = run_bits(&ConfigBuilder::new().build(), &[(0x7FC0_0000, 0x4040_0000)]);
    assert!(report.passed());
    assert_eq!(report.result.passed, 1);
}

#[test]
fn test_infinity_times_zero_correct_dut() {
    let report = run_bits(&ConfigBuilder::new().build(), &[(0x7F80_0000, 0x0000_0000)]);
    assert!(report.passed());
}

#[test]
fn test_infinity_times_zero_faulty_dut() {
    let config = ConfigBuilder::new().fault(FaultMode::InvalidAsZero).build();
    let report = run_bits(&config, &[(0x7F80_0000, 0x0000_0000), (0x4000_0000, 0x4000_0000)]);
    assert!(!report.passed());
    assert_eq!(report.result.passed, 1);
    assert_eq!(report.result.failed, 1);
    let m = &report.result.mismatches[0];
    assert_eq!(m.reason, MismatchReason::ValueMismatch);
    assert!(m.expected.unwrap().result().is_nan());
    assert_eq!(m.actual.unwrap().result.to_bits(), 0x0000_0000);
}

#[test]
fn test_back_to_back_pipelined() {
    let config = ConfigBuilder::new().latency(3).max_in_flight(2).build();
    let report = run_pairs(&config, &[(2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)]);
    assert!(report.passed());
    assert_eq!(report.result.passed, 4);
    assert_eq!(report.stats.issued, 4);
    assert_eq!(report.stats.observed, 4);
}

#[test]
fn test_pipelining_shortens_the_run() {
    let values = [(1.0, 2.0); 8];
    let serial = run_pairs(&ConfigBuilder::new().latency(4).build(), &values);
    let overlapped = run_pairs(&ConfigBuilder::new().latency(4).max_in_flight(3).build(), &values);
    assert!(serial.passed() && overlapped.passed());
    assert!(overlapped.stats.cycles < serial.stats.cycles);
}

#[test]
fn test_reordered_completion_is_a_protocol_violation() {
    let config = ConfigBuilder::new()
        .latency(3)
        .max_in_flight(2)
        .fault(FaultMode::SwapAdjacent)
        .build();
    let report = run_pairs(&config, &[(2.0, 2.0), (3.0, 3.0)]);
    assert!(!report.passed());
    assert_eq!(report.result.passed, 0);
    assert_eq!(report.result.mismatches.len(), 2);
    let m = &report.result.mismatches[0];
    assert_eq!(m.reason, MismatchReason::OutOfOrder);
    assert_eq!(m.expected.unwrap().result().to_f32(), 4.0);
    assert_eq!(m.actual.unwrap().result.to_f32(), 9.0);
    assert_eq!(report.result.value_mismatches().count(), 0);
}

#[test]
fn test_sign_flipped_zeros_in_flight_never_pass() {
    let config = ConfigBuilder::new()
        .max_in_flight(2)
        .fault(FaultMode::SignFlip)
        .build();
    let report = run_pairs(&config, &[(0.0, 1.0), (-0.0, 1.0)]);
    assert!(!report.passed());
    assert_eq!(report.result.passed, 0);
    assert_eq!(report.result.failed, 2);
}

#[test]
fn test_dropped_results_are_missing() {
    let config = ConfigBuilder::new()
        .latency(1)
        .fault(FaultMode::DropEvery(2))
        .completion_timeout(8)
        .build();
    let report = run_pairs(&config, &[(1.0, 1.0); 4]);
    assert!(!report.passed());
    assert_eq!(report.result.passed, 2);
    assert_eq!(report.stats.abandoned, 2);
    assert_eq!(
        report
            .result
            .mismatches
            .iter()
            .filter(|m| m.reason == MismatchReason::MissingTransaction)
            .count(),
        2
    );
}

#[test]
fn test_sign_flip_is_caught() {
    let config = ConfigBuilder::new().fault(FaultMode::SignFlip).build();
    let report = run_pairs(&config, &[(1.5, 2.0), (-3.0, 4.0)]);
    assert_eq!(report.result.value_mismatches().count(), 2);
}

#[test]
fn test_flushed_denormal_is_caught() {
    let config = ConfigBuilder::new().fault(FaultMode::FlushDenormals).build();
    // Largest denormal times 1.0 is itself.
    let report = run_bits(&config, &[(0x007F_FFFF, 0x3F80_0000)]);
    assert_eq!(report.result.value_mismatches().count(), 1);
}

#[rstest]
fn test_protocols_and_latencies_agree(
    #[values(StartProtocol::Pulse, StartProtocol::Hold)] protocol: StartProtocol,
    #[values(0, 1, 3)] latency: usize,
    #[values(1, 2)] max_in_flight: usize,
) {
    let config = ConfigBuilder::new()
        .protocol(protocol)
        .latency(latency)
        .max_in_flight(max_in_flight)
        .build();
    let report = run_bits(
        &config,
        &[
            (0x3FC0_0000, 0x4000_0000),
            (0x0000_0001, 0x3F00_0000),
            (0x7F7F_FFFF, 0x4000_0000),
            (0xFF80_0000, 0x8000_0000),
            (0x7F80_0001, 0x3F80_0000),
            (0x0080_0000, 0x3F00_0000),
        ],
    );
    assert!(report.passed(), "{:?}", report.result.mismatches);
    assert_eq!(report.result.passed, 6);
}

#[test]
fn test_random_scenario_is_reproducible() {
    init_tracing();
    let config = ConfigBuilder::new().seed(99).transactions(32).max_in_flight(2).build();
    let (a, b) = (StimulusKind::Random, StimulusKind::Denormal);
    let first = run_test(dut_for(&config), &config, a, b).unwrap();
    let second = run_test(dut_for(&config), &config, a, b).unwrap();
    assert!(first.passed());
    assert_eq!(first.result, second.result);
    assert_eq!(first.stats.cycles, second.stats.cycles);
    assert_eq!(first.name, "random_x_denormal");
}

#[test]
fn test_report_serializes() {
    let report = run_pairs(&ConfigBuilder::new().fault(FaultMode::SignFlip).build(), &[(1.0, 1.0)]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["result"]["failed"], 1);
    assert_eq!(json["result"]["mismatches"][0]["reason"], "value_mismatch");
    assert_eq!(json["stats"]["issued"], 1);
}
