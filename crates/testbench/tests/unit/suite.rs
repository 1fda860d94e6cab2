//! # Test Matrix
//!
//! Every (A-kind, B-kind) pair runs as its own scenario against a fresh,
//! correct multiplier and must pass.

use crate::common::harness::{ConfigBuilder, init_tracing};
use fpmul_tb::dut::FaultMode;
use fpmul_tb::stimulus::StimulusKind;
use fpmul_tb::suite::{self, TestCase, default_dut, run_case, run_cases, run_suite, test_cases};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn test_matrix_case_passes(
    #[values(
        StimulusKind::Random,
        StimulusKind::Normal,
        StimulusKind::Nan,
        StimulusKind::Denormal,
        StimulusKind::Zero,
        StimulusKind::Infinity
    )]
    a: StimulusKind,
    #[values(
        StimulusKind::Random,
        StimulusKind::Normal,
        StimulusKind::Nan,
        StimulusKind::Denormal,
        StimulusKind::Zero,
        StimulusKind::Infinity
    )]
    b: StimulusKind,
) {
    init_tracing();
    let config = ConfigBuilder::new().build();
    let index = test_cases().iter().position(|c| *c == TestCase { a, b }).unwrap() as u64;
    let case = run_case(default_dut(&config), &config, TestCase { a, b }, index).unwrap();
    assert!(case.report.passed(), "{}: {:?}", case.case.name(), case.report.result.mismatches);
    assert_eq!(case.report.result.passed, 16);
}

#[test]
fn test_case_list_order() {
    let names: Vec<String> = test_cases().iter().map(TestCase::name).collect();
    assert_eq!(names.len(), 36);
    assert_eq!(&names[..3], ["random_x_random", "random_x_normal", "random_x_nan"]);
    assert_eq!(names[6], "normal_x_random");
}

#[test]
fn test_full_suite_passes_with_pipelining() {
    init_tracing();
    let config = ConfigBuilder::new().transactions(8).max_in_flight(3).latency(4).build();
    let report = run_suite(&config, default_dut).unwrap();
    assert_eq!(report.cases.len(), 36);
    assert!(report.is_success());
    assert_eq!(report.passed(), 36);
    assert_eq!(report.failed(), 0);
}

#[test]
fn test_seeds_follow_matrix_position() {
    let config = ConfigBuilder::new().seed(100).transactions(2).build();
    let case = TestCase {
        a: StimulusKind::Zero,
        b: StimulusKind::Nan,
    };
    let report = run_cases(&config, &[case], default_dut).unwrap();
    assert_eq!(report.cases[0].seed, 100 + 26);
}

#[test]
fn test_sign_flip_fails_numeric_cases() {
    init_tracing();
    let config = ConfigBuilder::new().fault(FaultMode::SignFlip).transactions(4).build();
    let cases = [
        TestCase {
            a: StimulusKind::Normal,
            b: StimulusKind::Infinity,
        },
        TestCase {
            a: StimulusKind::Nan,
            b: StimulusKind::Normal,
        },
    ];
    let report = suite::run_cases(&config, &cases, default_dut).unwrap();
    assert!(!report.is_success());
    assert!(!report.cases[0].report.passed(), "infinite results change sign");
    assert!(report.cases[1].report.passed(), "NaN results match any NaN");
    assert_eq!(report.failed(), 1);
}
