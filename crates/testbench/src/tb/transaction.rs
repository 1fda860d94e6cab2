//! Transaction records.
//!
//! An expected [`Transaction`] is created by the reference model when the
//! input monitor sees an operand pair submitted. An [`ObservedResult`] is
//! created by the output monitor when the DUT raises `done`. The DUT boundary
//! carries no operand echo, so an observed result is tied to its operands only
//! through the expected entry it is reconciled against.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::float::FloatValue;
use crate::model::exception_flags::FpFlags;

/// One operand pair and its expected product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    a: FloatValue,
    b: FloatValue,
    result: FloatValue,
    flags: FpFlags,
    cycle: u64,
}

impl Transaction {
    /// Creates a transaction with no flags, submitted at cycle zero.
    pub const fn new(a: FloatValue, b: FloatValue, result: FloatValue) -> Self {
        Self {
            a,
            b,
            result,
            flags: FpFlags::NONE,
            cycle: 0,
        }
    }

    /// Attaches the exception flags raised by the reference model.
    #[must_use]
    pub const fn with_flags(mut self, flags: FpFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Records the rising edge on which the operands were submitted.
    #[must_use]
    pub const fn at_cycle(mut self, cycle: u64) -> Self {
        self.cycle = cycle;
        self
    }

    /// Operand A.
    pub const fn a(&self) -> FloatValue {
        self.a
    }

    /// Operand B.
    pub const fn b(&self) -> FloatValue {
        self.b
    }

    /// Expected product.
    pub const fn result(&self) -> FloatValue {
        self.result
    }

    /// Exception flags of the product.
    pub const fn flags(&self) -> FpFlags {
        self.flags
    }

    /// Submission cycle.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{} {} * {} = {} [{}]",
            self.cycle, self.a, self.b, self.result, self.flags
        )
    }
}

/// A result captured from the DUT's output pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ObservedResult {
    /// Decoded `result` bus.
    pub result: FloatValue,
    /// Rising edge on which `done` was sampled high.
    pub cycle: u64,
}

impl fmt::Display for ObservedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {}", self.cycle, self.result)
    }
}

/// FIFO of expected transactions awaiting their DUT result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedQueue {
    entries: VecDeque<Transaction>,
}

impl ExpectedQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transaction at the tail.
    pub fn push(&mut self, txn: Transaction) {
        self.entries.push_back(txn);
    }

    /// Removes and returns the oldest transaction.
    pub fn pop_oldest(&mut self) -> Option<Transaction> {
        self.entries.pop_front()
    }

    /// Oldest transaction, if any.
    pub fn oldest(&self) -> Option<&Transaction> {
        self.entries.front()
    }

    /// Number of queued transactions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is awaiting a result.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }
}

impl FromIterator<Transaction> for ExpectedQueue {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
