//! Testbench orchestrator.
//!
//! This module owns every piece of one verification scenario and advances
//! them together, one clock cycle at a time. It provides:
//! 1. **Lifecycle:** The `Idle -> Running -> Draining -> Done` state machine.
//! 2. **Cycle loop:** [`Testbench::advance_one_cycle`] with a fixed phase order.
//! 3. **Model wiring:** [`ModelListener`], which turns observed submissions
//!    into expected transactions.
//! 4. **Scenarios:** [`run_directed`] and [`run_test`] run a complete case and
//!    return its [`TestReport`].
//!
//! Phase order within a cycle:
//! drive (clock low) -> rising edge (DUT evaluates) -> sample inputs ->
//! sample outputs -> scoreboard -> clock falls.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::common::error::{Result, TestbenchError};
use crate::config::TestbenchConfig;
use crate::dut::{Dut, Pins};
use crate::float::FloatValue;
use crate::model::ReferenceModel;
use crate::stats::RunStats;
use crate::stimulus::{StimulusGenerator, StimulusKind};
use crate::tb::clock::Clock;
use crate::tb::driver::InputDriver;
use crate::tb::monitor::{InputMonitor, OutputMonitor, TransactionListener};
use crate::tb::scoreboard::{InterfaceId, Scoreboard, ScoreboardResult};
use crate::tb::transaction::{ExpectedQueue, Transaction};

/// Lifecycle of a [`Testbench`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestbenchState {
    /// Built, clock not yet running.
    Idle,
    /// Driving stimulus.
    Running,
    /// Stimulus stopped, in-flight results still being captured.
    Draining,
    /// Scoreboard finalized.
    Done,
}

impl fmt::Display for TestbenchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Draining => "DRAINING",
            Self::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// Reference model attached to the input monitor.
///
/// Every submission it hears about is multiplied by the model and appended
/// to the expected queue, until it is stopped.
#[derive(Debug, Clone)]
pub struct ModelListener {
    model: ReferenceModel,
    expected: ExpectedQueue,
    active: bool,
}

impl ModelListener {
    /// Creates an active listener with an empty queue.
    pub fn new(model: ReferenceModel) -> Self {
        Self {
            model,
            expected: ExpectedQueue::new(),
            active: true,
        }
    }

    /// Stops producing expectations.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Returns true while expectations are being produced.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Expectations not yet reconciled.
    pub const fn expected(&self) -> &ExpectedQueue {
        &self.expected
    }

    /// Mutable access for the scoreboard.
    pub const fn expected_mut(&mut self) -> &mut ExpectedQueue {
        &mut self.expected
    }

    /// Queues the expectation of `a * b` whether or not the listener is active.
    pub fn record(&mut self, a: FloatValue, b: FloatValue, cycle: u64) {
        let (result, flags) = self.model.compute_with_flags(a, b);
        let txn = Transaction::new(a, b, result)
            .with_flags(flags)
            .at_cycle(cycle);
        debug!(expected = %txn, "expectation queued");
        self.expected.push(txn);
    }
}

impl TransactionListener for ModelListener {
    fn on_transaction(&mut self, a: FloatValue, b: FloatValue, cycle: u64) {
        if !self.active {
            debug!(cycle, a = %a, b = %b, "submission after stop, no expectation");
            return;
        }
        self.record(a, b, cycle);
    }
}

/// Outcome of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    /// Scenario name.
    pub name: String,
    /// Scoreboard outcome.
    pub result: ScoreboardResult,
    /// Run counters.
    pub stats: RunStats,
}

impl TestReport {
    /// Returns true when no comparison failed, no protocol was violated and
    /// every operation completed within the completion timeout.
    pub fn passed(&self) -> bool {
        self.result.is_success() && self.stats.abandoned == 0
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        println!(
            "{verdict} {} ({} passed, {} failed)",
            self.name, self.result.passed, self.result.failed
        );
        if self.stats.abandoned > 0 {
            println!("  {} operation(s) timed out", self.stats.abandoned);
        }
        for mismatch in &self.result.mismatches {
            println!("  {mismatch}");
        }
    }
}

/// Clock-driven harness around one DUT.
#[derive(Debug)]
pub struct Testbench<D: Dut> {
    name: String,
    state: TestbenchState,
    clock: Clock,
    pins: Pins,
    dut: D,
    driver: InputDriver,
    input_monitor: InputMonitor<ModelListener>,
    output_monitor: OutputMonitor,
    scoreboard: Scoreboard,
    interface: InterfaceId,
    max_cycles: u64,
    drain_cycles: u64,
    drained: u64,
    stats: RunStats,
}

impl<D: Dut> Testbench<D> {
    /// Builds an idle testbench around `dut`.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::Config`] if `config` fails validation.
    pub fn new(dut: D, config: &TestbenchConfig) -> Result<Self> {
        config.validate()?;
        let output_monitor = OutputMonitor::new(format!("{}.out", dut.name()));
        let mut scoreboard = Scoreboard::new();
        let interface = scoreboard.add_interface(&output_monitor);
        let listener = ModelListener::new(ReferenceModel::new(config.model.rounding));
        Ok(Self {
            name: dut.name().to_string(),
            state: TestbenchState::Idle,
            clock: Clock::new(config.clock.period_ps),
            pins: Pins::default(),
            dut,
            driver: InputDriver::new(
                config.driver.protocol,
                config.driver.max_in_flight,
                config.driver.completion_timeout,
            ),
            input_monitor: InputMonitor::new(listener),
            output_monitor,
            scoreboard,
            interface,
            max_cycles: config.run.max_cycles,
            drain_cycles: config.run.drain_cycles,
            drained: 0,
            stats: RunStats::new(),
        })
    }

    /// Names the scenario in logs and in the report.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Queues one operand pair.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::AlreadyStopped`] after [`Testbench::stop`].
    pub fn queue(&mut self, a: FloatValue, b: FloatValue) -> Result<()> {
        self.driver.enqueue(a, b)
    }

    /// Queues operand pairs in order.
    ///
    /// # Errors
    ///
    /// See [`Testbench::queue`].
    pub fn queue_all<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (FloatValue, FloatValue)>,
    {
        for (a, b) in pairs {
            self.queue(a, b)?;
        }
        Ok(())
    }

    /// `Idle -> Running`: starts the driver and the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::InvalidTransition`] from any other state.
    pub fn start(&mut self) -> Result<()> {
        self.transition(TestbenchState::Idle, TestbenchState::Running)?;
        self.driver.start()
    }

    /// `Running -> Draining`: stops new stimulus and new expectations.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::InvalidTransition`] from any other state.
    pub fn stop(&mut self) -> Result<()> {
        self.transition(TestbenchState::Running, TestbenchState::Draining)?;
        self.input_monitor.listener_mut().stop();
        self.driver.stop()
    }

    /// Simulates one full clock cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::NotStarted`] before [`Testbench::start`] and
    /// [`TestbenchError::AlreadyStopped`] once the scenario is done.
    pub fn advance_one_cycle(&mut self) -> Result<()> {
        match self.state {
            TestbenchState::Idle => return Err(TestbenchError::NotStarted),
            TestbenchState::Done => return Err(TestbenchError::AlreadyStopped),
            TestbenchState::Running => {}
            TestbenchState::Draining => {
                self.drained += 1;
                self.stats.drain_cycles += 1;
            }
        }

        let cycle = self.clock.cycles();
        self.driver.drive(&mut self.pins, cycle);

        let edge = self.clock.rise();
        self.pins.clk = true;
        self.dut.on_rising_edge(&mut self.pins);

        let _ = self.input_monitor.sample(&self.pins, edge);
        let _ = self.output_monitor.sample(&self.pins, edge);
        self.scoreboard.reconcile(
            self.interface,
            &mut self.output_monitor,
            self.input_monitor.listener_mut().expected_mut(),
        );

        self.clock.fall();
        self.pins.clk = false;

        if self.driver.in_flight() == 0 && !self.pins.start {
            self.stats.idle_cycles += 1;
        }
        self.stats.cycles = self.clock.cycles();
        self.stats.sim_time_ps = self.clock.time_ps();
        trace!(
            tb = %self.name,
            cycle = edge,
            start = self.pins.start,
            done = self.pins.done,
            "cycle"
        );
        Ok(())
    }

    /// Advances until every queued operation has completed or been abandoned.
    ///
    /// Returns false if the `max_cycles` watchdog stopped the run first.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::InvalidTransition`] unless running.
    pub fn run_until_idle(&mut self) -> Result<bool> {
        if self.state != TestbenchState::Running {
            return Err(TestbenchError::InvalidTransition {
                from: self.state,
                to: TestbenchState::Running,
            });
        }
        while !self.driver.is_idle() {
            if self.clock.cycles() >= self.max_cycles {
                warn!(
                    tb = %self.name,
                    cycles = self.clock.cycles(),
                    pending = self.driver.pending(),
                    in_flight = self.driver.in_flight(),
                    "watchdog expired"
                );
                return Ok(false);
            }
            self.advance_one_cycle()?;
        }
        Ok(true)
    }

    /// `Draining -> Done`: runs the remaining drain cycles, finalizes the
    /// scoreboard and returns the report.
    ///
    /// Operand pairs that were queued but never driven are reported as
    /// missing transactions.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::InvalidTransition`] unless draining.
    pub fn finish(&mut self) -> Result<TestReport> {
        if self.state != TestbenchState::Draining {
            return Err(TestbenchError::InvalidTransition {
                from: self.state,
                to: TestbenchState::Done,
            });
        }
        while self.drained < self.drain_cycles {
            self.advance_one_cycle()?;
        }

        let undriven = self.driver.take_pending();
        if !undriven.is_empty() {
            warn!(tb = %self.name, count = undriven.len(), "operand pairs never driven");
        }
        let cycle = self.clock.cycles();
        let listener = self.input_monitor.listener_mut();
        for (a, b) in undriven {
            listener.record(a, b, cycle);
        }
        self.scoreboard.finalize(self.interface, listener.expected_mut());
        self.transition(TestbenchState::Draining, TestbenchState::Done)?;

        self.stats.issued = self.driver.issued();
        self.stats.abandoned = self.driver.abandoned();
        self.stats.observed = self.output_monitor.total();
        self.stats.stop_clock();

        let report = TestReport {
            name: self.name.clone(),
            result: self.scoreboard.result().clone(),
            stats: self.stats.clone(),
        };
        if report.passed() {
            info!(tb = %self.name, passed = report.result.passed, "PASS");
        } else {
            info!(
                tb = %self.name,
                passed = report.result.passed,
                failed = report.result.failed,
                "FAIL"
            );
        }
        Ok(report)
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> TestbenchState {
        self.state
    }

    /// Current pin values.
    pub const fn pins(&self) -> &Pins {
        &self.pins
    }

    /// Rising edges simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.clock.cycles()
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The device under test.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// The input driver.
    pub const fn driver(&self) -> &InputDriver {
        &self.driver
    }

    /// Expectations not yet reconciled.
    pub const fn expected(&self) -> &ExpectedQueue {
        self.input_monitor.listener().expected()
    }

    /// Scoreboard outcome so far.
    pub const fn scoreboard(&self) -> &ScoreboardResult {
        self.scoreboard.result()
    }

    fn transition(&mut self, from: TestbenchState, to: TestbenchState) -> Result<()> {
        if self.state != from {
            return Err(TestbenchError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        info!(tb = %self.name, "{} -> {}", from, to);
        self.state = to;
        Ok(())
    }
}

/// Runs one scenario over explicit operand pairs.
///
/// # Errors
///
/// Returns [`TestbenchError::Config`] for an invalid configuration. Failures
/// of the DUT, including a run cut short by the `max_cycles` watchdog, are
/// reported in the returned [`TestReport`], not as errors.
pub fn run_directed<D, I>(
    dut: D,
    config: &TestbenchConfig,
    name: &str,
    pairs: I,
) -> Result<TestReport>
where
    D: Dut,
    I: IntoIterator<Item = (FloatValue, FloatValue)>,
{
    let mut tb = Testbench::new(dut, config)?.with_name(name);
    tb.queue_all(pairs)?;
    tb.start()?;
    if !tb.run_until_idle()? {
        warn!(tb = %tb.name(), "stopping early, unfinished work is reported as missing");
    }
    tb.stop()?;
    tb.finish()
}

/// Runs one randomized scenario.
///
/// Drives `config.run.transactions_per_case` operand pairs, operand A drawn
/// from `a_kind` and operand B from `b_kind`, seeded by `config.run.seed`.
///
/// # Errors
///
/// See [`run_directed`].
pub fn run_test<D: Dut>(
    dut: D,
    config: &TestbenchConfig,
    a_kind: StimulusKind,
    b_kind: StimulusKind,
) -> Result<TestReport> {
    let mut generator = StimulusGenerator::new(config.run.seed);
    let pairs: Vec<_> = (0..config.run.transactions_per_case)
        .map(|_| generator.generate_pair(a_kind, b_kind))
        .collect();
    run_directed(dut, config, &case_name(a_kind, b_kind), pairs)
}

/// Name of the scenario multiplying `a_kind` by `b_kind`.
pub fn case_name(a_kind: StimulusKind, b_kind: StimulusKind) -> String {
    format!("{a_kind}_x_{b_kind}")
}
