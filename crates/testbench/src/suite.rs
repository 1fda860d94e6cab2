//! Test matrix.
//!
//! Every ordered pair of stimulus kinds is one test case, giving
//! `6 x 6 = 36` cases. Each case runs as an independent scenario against a
//! freshly built DUT, with its own seed derived from the base seed and the
//! case index.

use serde::Serialize;
use tracing::info;

use crate::common::error::Result;
use crate::config::TestbenchConfig;
use crate::dut::{Dut, PipelinedMultiplier};
use crate::stimulus::StimulusKind;
use crate::tb::testbench::{TestReport, case_name, run_test};

/// One cell of the test matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TestCase {
    /// Kind of operand A.
    pub a: StimulusKind,
    /// Kind of operand B.
    pub b: StimulusKind,
}

impl TestCase {
    /// Case name as shown in reports.
    pub fn name(&self) -> String {
        case_name(self.a, self.b)
    }
}

/// All 36 (A-kind, B-kind) cases, A-major in [`StimulusKind::ALL`] order.
pub fn test_cases() -> Vec<TestCase> {
    StimulusKind::ALL
        .into_iter()
        .flat_map(|a| StimulusKind::ALL.into_iter().map(move |b| TestCase { a, b }))
        .collect()
}

/// Builds the behavioral DUT described by `config.dut`.
pub fn default_dut(config: &TestbenchConfig) -> PipelinedMultiplier {
    PipelinedMultiplier::new(config.dut.latency)
        .with_fault(config.dut.fault)
        .with_rounding(config.model.rounding)
}

/// Outcome of a case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Which cell of the matrix ran.
    pub case: TestCase,
    /// Seed the case's stimulus was drawn from.
    pub seed: u64,
    /// Scenario report.
    pub report: TestReport,
}

/// Outcome of a suite.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    /// Per-case results, in execution order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Cases with no failures.
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.report.passed()).count()
    }

    /// Cases with at least one failure.
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    /// Returns true when every case passed.
    pub fn is_success(&self) -> bool {
        self.cases.iter().all(|c| c.report.passed())
    }

    /// Prints every case and a totals line to stdout.
    pub fn print(&self) {
        for case in &self.cases {
            case.report.print();
        }
        println!(
            "\n{} cases: {} passed, {} failed",
            self.cases.len(),
            self.passed(),
            self.failed()
        );
    }
}

/// Runs one case with the seed of matrix position `index`.
///
/// # Errors
///
/// Returns the harness error that aborted the scenario.
pub fn run_case<D: Dut>(
    dut: D,
    config: &TestbenchConfig,
    case: TestCase,
    index: u64,
) -> Result<CaseReport> {
    let seed = config.run.seed.wrapping_add(index);
    let mut case_config = config.clone();
    case_config.run.seed = seed;
    let report = run_test(dut, &case_config, case.a, case.b)?;
    Ok(CaseReport { case, seed, report })
}

/// Runs `cases`, building a fresh DUT for each with `factory`.
///
/// Case seeds follow the position of each case in [`test_cases`], so a
/// filtered run reproduces the same stimulus as the full matrix.
///
/// # Errors
///
/// Stops at the first harness error. DUT failures do not stop the suite.
pub fn run_cases<D, F>(
    config: &TestbenchConfig,
    cases: &[TestCase],
    mut factory: F,
) -> Result<SuiteReport>
where
    D: Dut,
    F: FnMut(&TestbenchConfig) -> D,
{
    let matrix = test_cases();
    let mut suite = SuiteReport::default();
    for &case in cases {
        let index = matrix.iter().position(|c| *c == case).unwrap_or(0) as u64;
        let result = run_case(factory(config), config, case, index)?;
        suite.cases.push(result);
    }
    info!(
        cases = suite.cases.len(),
        passed = suite.passed(),
        failed = suite.failed(),
        "suite finished"
    );
    Ok(suite)
}

/// Runs the full 36-case matrix.
///
/// # Errors
///
/// See [`run_cases`].
pub fn run_suite<D, F>(config: &TestbenchConfig, factory: F) -> Result<SuiteReport>
where
    D: Dut,
    F: FnMut(&TestbenchConfig) -> D,
{
    run_cases(config, &test_cases(), factory)
}
