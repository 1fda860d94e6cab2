//! In-order scoreboard.
//!
//! Reconciles what the DUT produced against what the reference model
//! expected. Each registered interface pairs an output monitor's observed
//! stream with an expected queue; both are owned by the testbench and lent to
//! the scoreboard when it runs. Rules, applied per observed result:
//!
//! 1. **Unexpected:** The expected queue is empty.
//! 2. **Pass:** The result is bit-identical to the oldest expectation, or both
//!    are NaN.
//! 3. **Out of order:** The result misses the oldest expectation but matches
//!    a later one, or one displaced earlier. A protocol violation.
//! 4. **Value mismatch:** Anything else.
//!
//! Every result consumes the oldest expectation, so a wrong result is never
//! credited as a pass by shifting the queue.
//!
//! Expectations still queued at [`Scoreboard::finalize`] are missing.

use std::fmt;

use serde::Serialize;
use tracing::{error, trace, warn};

use crate::float::nan_handling::nan_equivalent;
use crate::tb::monitor::OutputMonitor;
use crate::tb::transaction::{ExpectedQueue, ObservedResult, Transaction};

/// Handle to an interface registered with a [`Scoreboard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct InterfaceId(usize);

impl InterfaceId {
    /// Registration index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Why a comparison failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReason {
    /// The DUT and the model disagree on the product.
    ValueMismatch,
    /// A result arrived with nothing expected.
    UnexpectedTransaction,
    /// An expected result never arrived.
    MissingTransaction,
    /// Results completed in a different order than they were submitted.
    OutOfOrder,
}

impl MismatchReason {
    /// Returns true for handshake or ordering failures, as opposed to wrong values.
    pub const fn is_protocol_violation(self) -> bool {
        !matches!(self, Self::ValueMismatch)
    }

    /// Human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValueMismatch => "value mismatch",
            Self::UnexpectedTransaction => "unexpected transaction",
            Self::MissingTransaction => "missing transaction",
            Self::OutOfOrder => "out-of-order transaction",
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Interface the comparison belongs to.
    pub interface: InterfaceId,
    /// Model expectation, absent for unexpected results.
    pub expected: Option<Transaction>,
    /// DUT result, absent for missing results.
    pub actual: Option<ObservedResult>,
    /// Failure class.
    pub reason: MismatchReason,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected ", self.reason)?;
        match &self.expected {
            Some(txn) => write!(f, "{txn}")?,
            None => f.write_str("nothing")?,
        }
        f.write_str(", got ")?;
        match &self.actual {
            Some(obs) => write!(f, "{obs}"),
            None => f.write_str("nothing"),
        }
    }
}

/// Outcome of a scoreboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreboardResult {
    /// Comparisons that matched.
    pub passed: u64,
    /// Comparisons that failed, of any reason.
    pub failed: u64,
    /// Every failure, in the order detected.
    pub mismatches: Vec<Mismatch>,
}

impl ScoreboardResult {
    /// Returns true when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.mismatches.is_empty()
    }

    /// Failures that are handshake or ordering violations.
    pub fn protocol_violations(&self) -> impl Iterator<Item = &Mismatch> {
        self.mismatches
            .iter()
            .filter(|m| m.reason.is_protocol_violation())
    }

    /// Failures where the DUT produced a wrong value.
    pub fn value_mismatches(&self) -> impl Iterator<Item = &Mismatch> {
        self.mismatches
            .iter()
            .filter(|m| m.reason == MismatchReason::ValueMismatch)
    }
}

#[derive(Debug, Clone)]
struct Interface {
    name: String,
    /// Heads consumed by a result that belonged to a later expectation.
    displaced: Vec<Transaction>,
}

impl Interface {
    fn classify(
        &mut self,
        head: Transaction,
        actual: ObservedResult,
        remaining: &ExpectedQueue,
    ) -> MismatchReason {
        if remaining
            .iter()
            .any(|txn| nan_equivalent(txn.result(), actual.result))
        {
            self.displaced.push(head);
            return MismatchReason::OutOfOrder;
        }
        if let Some(pos) = self
            .displaced
            .iter()
            .position(|txn| nan_equivalent(txn.result(), actual.result))
        {
            let _ = self.displaced.swap_remove(pos);
            return MismatchReason::OutOfOrder;
        }
        MismatchReason::ValueMismatch
    }
}

/// Compares observed DUT results against model expectations.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    interfaces: Vec<Interface>,
    result: ScoreboardResult,
}

impl Scoreboard {
    /// Creates a scoreboard with no interfaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the observed stream of `monitor`.
    ///
    /// The returned id selects this pairing in [`Scoreboard::reconcile`] and
    /// [`Scoreboard::finalize`].
    pub fn add_interface(&mut self, monitor: &OutputMonitor) -> InterfaceId {
        let id = InterfaceId(self.interfaces.len());
        self.interfaces.push(Interface {
            name: monitor.name().to_string(),
            displaced: Vec::new(),
        });
        id
    }

    /// Checks a single observed result against `expected`.
    ///
    /// Each result consumes the oldest expectation and only passes if it
    /// matches it. A wrong result that equals another outstanding or
    /// recently displaced expectation is labelled out-of-order instead of a
    /// value mismatch.
    pub fn compare(
        &mut self,
        id: InterfaceId,
        expected: &mut ExpectedQueue,
        actual: ObservedResult,
    ) {
        let Some(head) = expected.pop_oldest() else {
            self.fail(id, None, Some(actual), MismatchReason::UnexpectedTransaction);
            return;
        };

        if nan_equivalent(head.result(), actual.result) {
            trace!(
                interface = self.interface_name(id),
                txn = %head,
                flags = %head.flags(),
                "match"
            );
            self.result.passed += 1;
            return;
        }

        let reason = match self.interfaces.get_mut(id.0) {
            Some(interface) => interface.classify(head, actual, expected),
            None => MismatchReason::ValueMismatch,
        };
        self.fail(id, Some(head), Some(actual), reason);
    }

    /// Consumes everything `monitor` has captured.
    pub fn reconcile(
        &mut self,
        id: InterfaceId,
        monitor: &mut OutputMonitor,
        expected: &mut ExpectedQueue,
    ) {
        for actual in monitor.drain() {
            self.compare(id, expected, actual);
        }
    }

    /// Reports every expectation still queued as missing.
    ///
    /// Calling it again on the same queue changes nothing.
    pub fn finalize(&mut self, id: InterfaceId, expected: &mut ExpectedQueue) {
        while let Some(txn) = expected.pop_oldest() {
            self.fail(id, Some(txn), None, MismatchReason::MissingTransaction);
        }
        if let Some(interface) = self.interfaces.get_mut(id.0) {
            interface.displaced.clear();
        }
    }

    /// Outcome so far.
    pub const fn result(&self) -> &ScoreboardResult {
        &self.result
    }

    /// Consumes the scoreboard and returns its outcome.
    pub fn into_result(self) -> ScoreboardResult {
        self.result
    }

    fn interface_name(&self, id: InterfaceId) -> &str {
        self.interfaces
            .get(id.0)
            .map_or("unregistered", |i| i.name.as_str())
    }

    fn fail(
        &mut self,
        interface: InterfaceId,
        expected: Option<Transaction>,
        actual: Option<ObservedResult>,
        reason: MismatchReason,
    ) {
        let mismatch = Mismatch {
            interface,
            expected,
            actual,
            reason,
        };
        let name = self.interface_name(interface);
        if reason.is_protocol_violation() {
            error!(interface = name, "{mismatch}");
        } else {
            warn!(interface = name, "{mismatch}");
        }
        self.result.failed += 1;
        self.result.mismatches.push(mismatch);
    }
}
