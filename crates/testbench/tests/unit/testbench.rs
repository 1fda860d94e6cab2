//! # Orchestrator Tests
//!
//! Lifecycle transitions, the cycle loop and the watchdog, driven against
//! both the behavioral multiplier and a mocked DUT.

use crate::common::harness::{ConfigBuilder, dut_for, init_tracing, pairs, run_pairs};
use crate::common::mocks::MockMultiplier;
use fpmul_tb::TestbenchError;
use fpmul_tb::config::TestbenchConfig;
use fpmul_tb::dut::PipelinedMultiplier;
use fpmul_tb::float::FloatValue;
use fpmul_tb::tb::{MismatchReason, Testbench, TestbenchState};
use pretty_assertions::assert_eq;

#[test]
fn test_lifecycle_states() {
    init_tracing();
    let mut tb = Testbench::new(PipelinedMultiplier::new(2), &TestbenchConfig::default()).unwrap();
    assert_eq!(tb.state(), TestbenchState::Idle);
    tb.start().unwrap();
    assert_eq!(tb.state(), TestbenchState::Running);
    tb.stop().unwrap();
    assert_eq!(tb.state(), TestbenchState::Draining);
    let report = tb.finish().unwrap();
    assert_eq!(tb.state(), TestbenchState::Done);
    assert!(report.passed());
    assert_eq!(report.stats.cycles, 1, "one drain cycle");
}

#[test]
fn test_invalid_transitions() {
    let mut tb = Testbench::new(PipelinedMultiplier::new(2), &TestbenchConfig::default()).unwrap();
    assert!(matches!(
        tb.finish(),
        Err(TestbenchError::InvalidTransition {
            from: TestbenchState::Idle,
            to: TestbenchState::Done
        })
    ));
    assert!(matches!(tb.run_until_idle(), Err(TestbenchError::InvalidTransition { .. })));
    tb.start().unwrap();
    assert!(matches!(
        tb.start(),
        Err(TestbenchError::InvalidTransition {
            from: TestbenchState::Running,
            to: TestbenchState::Running
        })
    ));
    assert!(matches!(tb.finish(), Err(TestbenchError::InvalidTransition { .. })));
    tb.stop().unwrap();
    assert!(matches!(tb.stop(), Err(TestbenchError::InvalidTransition { .. })));
    let (a, b) = (FloatValue::from_f32(1.0), FloatValue::from_f32(1.0));
    assert!(matches!(tb.queue(a, b), Err(TestbenchError::AlreadyStopped)));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = TestbenchConfig::default();
    config.run.drain_cycles = 0;
    assert!(matches!(
        Testbench::new(PipelinedMultiplier::new(1), &config),
        Err(TestbenchError::Config(_))
    ));
}

#[test]
fn test_clock_and_time_advance() {
    let mut tb = Testbench::new(PipelinedMultiplier::new(1), &TestbenchConfig::default()).unwrap();
    tb.start().unwrap();
    for _ in 0..10 {
        tb.advance_one_cycle().unwrap();
        assert!(!tb.pins().clk, "each cycle ends with the clock low");
    }
    assert_eq!(tb.cycles(), 10);
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert_eq!(report.stats.cycles, 11);
    assert_eq!(report.stats.sim_time_ps, 11 * 10_000);
    assert_eq!(report.stats.idle_cycles, 11);
}

#[test]
fn test_watchdog_stops_a_slow_dut() {
    init_tracing();
    let config = ConfigBuilder::new().max_cycles(5).build();
    let mut tb = Testbench::new(PipelinedMultiplier::new(20), &config).unwrap();
    tb.queue_all(pairs(&[(2.0, 2.0)])).unwrap();
    tb.start().unwrap();
    assert!(!tb.run_until_idle().unwrap());
    assert_eq!(tb.cycles(), 5);
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert_eq!(report.result.mismatches.len(), 1);
    assert_eq!(report.result.mismatches[0].reason, MismatchReason::MissingTransaction);
}

#[test]
fn test_watchdog_reports_undriven_pairs_as_missing() {
    let config = ConfigBuilder::new().max_cycles(20).build();
    let report = run_pairs(&config, &[(1.0, 2.0); 50]);
    assert!(!report.passed());
    assert_eq!(report.stats.issued, 5);
    assert_eq!(report.result.passed, 5);
    assert_eq!(report.result.failed, 45);
    assert!(
        report
            .result
            .mismatches
            .iter()
            .all(|m| m.reason == MismatchReason::MissingTransaction)
    );
}

#[test]
fn test_slow_dut_never_exceeds_in_flight_limit() {
    init_tracing();
    // Latency beyond the default completion timeout of 64.
    let config = ConfigBuilder::new().latency(70).build();
    let mut tb = Testbench::new(dut_for(&config), &config).unwrap();
    tb.queue_all(pairs(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)])).unwrap();
    tb.start().unwrap();
    let mut deepest = 0;
    while !tb.driver().is_idle() {
        tb.advance_one_cycle().unwrap();
        deepest = deepest.max(tb.dut().in_flight());
    }
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert_eq!(deepest, 1);
    assert_eq!(report.stats.abandoned, 3);
    assert_eq!(report.result.passed, 3, "late results still match");
    assert!(!report.passed(), "timed-out operations fail the case");
}

#[test]
fn test_expected_queue_visible_while_running() {
    let mut tb = Testbench::new(PipelinedMultiplier::new(4), &TestbenchConfig::default()).unwrap();
    tb.queue_all(pairs(&[(3.0, 3.0)])).unwrap();
    tb.start().unwrap();
    tb.advance_one_cycle().unwrap();
    assert_eq!(tb.expected().len(), 1);
    assert_eq!(tb.expected().oldest().unwrap().result().to_f32(), 9.0);
    assert_eq!(tb.driver().in_flight(), 1);
}

#[test]
fn test_mock_dut_is_clocked_once_per_cycle() {
    init_tracing();
    let mut dut = MockMultiplier::new();
    let _ = dut.expect_on_rising_edge().times(11).returning(|pins| pins.done = false);
    let config = ConfigBuilder::new().completion_timeout(4).build();
    let mut tb = Testbench::new(dut, &config).unwrap();
    tb.queue_all(pairs(&[(1.0, 1.0)])).unwrap();
    tb.start().unwrap();
    assert!(tb.run_until_idle().unwrap());
    // Abandoned at cycle 5, slot released at cycle 9.
    assert_eq!(tb.cycles(), 10);
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert!(!report.passed());
    assert_eq!(report.stats.abandoned, 1);
    assert_eq!(report.result.mismatches.len(), 1);
    assert_eq!(report.result.mismatches[0].reason, MismatchReason::MissingTransaction);
}

#[test]
fn test_mock_dut_spurious_done_is_unexpected() {
    init_tracing();
    let mut dut = MockMultiplier::new();
    let _ = dut.expect_on_rising_edge().returning(|pins| {
        pins.done = true;
        pins.result = 0x3F80_0000;
    });
    let mut tb = Testbench::new(dut, &TestbenchConfig::default()).unwrap();
    tb.start().unwrap();
    for _ in 0..3 {
        tb.advance_one_cycle().unwrap();
    }
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert_eq!(report.result.failed, 4);
    assert!(
        report
            .result
            .mismatches
            .iter()
            .all(|m| m.reason == MismatchReason::UnexpectedTransaction && m.expected.is_none())
    );
}

#[test]
fn test_mock_single_cycle_dut_passes() {
    init_tracing();
    let mut dut = MockMultiplier::new();
    let _ = dut.expect_on_rising_edge().returning(|pins| {
        pins.done = pins.start;
        pins.result = (f32::from_bits(pins.a) * f32::from_bits(pins.b)).to_bits();
    });
    let mut tb = Testbench::new(dut, &TestbenchConfig::default()).unwrap();
    tb.queue_all(pairs(&[(1.5, 2.0), (-0.25, 8.0), (3.0, 0.0)])).unwrap();
    tb.start().unwrap();
    assert!(tb.run_until_idle().unwrap());
    tb.stop().unwrap();
    let report = tb.finish().unwrap();
    assert!(report.passed(), "{:?}", report.result.mismatches);
    assert_eq!(report.result.passed, 3);
    assert_eq!(report.stats.issued, 3);
    assert_eq!(report.stats.observed, 3);
}
