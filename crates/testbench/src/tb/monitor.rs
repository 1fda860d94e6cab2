//! Passive interface monitors.
//!
//! Monitors only observe the pins; they never drive them. Both sample after
//! the DUT has evaluated a rising edge:
//!
//! 1. **[`InputMonitor`]:** Detects each submitted operation (a rising edge of
//!    `start`) and hands the operands to its [`TransactionListener`].
//! 2. **[`OutputMonitor`]:** Captures `result` whenever `done` is high. `done`
//!    is a single-cycle strobe, so each high sample is one result.

use std::collections::VecDeque;

use tracing::trace;

use crate::dut::Pins;
use crate::float::FloatValue;
use crate::tb::transaction::ObservedResult;

/// Receives the operand pairs seen by an [`InputMonitor`].
pub trait TransactionListener {
    /// Called once per submitted operation, in submission order.
    fn on_transaction(&mut self, a: FloatValue, b: FloatValue, cycle: u64);
}

/// Observes operand submissions on the input side.
#[derive(Debug)]
pub struct InputMonitor<L: TransactionListener> {
    listener: L,
    prev_start: bool,
    fired: u64,
}

impl<L: TransactionListener> InputMonitor<L> {
    /// Creates a monitor that reports to `listener`.
    pub const fn new(listener: L) -> Self {
        Self {
            listener,
            prev_start: false,
            fired: 0,
        }
    }

    /// Samples the input pins after a rising edge.
    ///
    /// Returns true if an operation was submitted on this edge. A `start`
    /// held high over several edges counts once.
    pub fn sample(&mut self, pins: &Pins, cycle: u64) -> bool {
        let submitted = pins.start && !self.prev_start;
        self.prev_start = pins.start;
        if submitted {
            let a = FloatValue::from_bits(pins.a);
            let b = FloatValue::from_bits(pins.b);
            trace!(cycle, a = %a, b = %b, "input observed");
            self.fired += 1;
            self.listener.on_transaction(a, b, cycle);
        }
        submitted
    }

    /// Submissions observed so far.
    pub const fn fired(&self) -> u64 {
        self.fired
    }

    /// The attached listener.
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the attached listener.
    pub const fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
}

/// Captures results on the output side.
#[derive(Debug, Clone)]
pub struct OutputMonitor {
    name: String,
    observed: VecDeque<ObservedResult>,
    total: u64,
}

impl OutputMonitor {
    /// Creates a named monitor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observed: VecDeque::new(),
            total: 0,
        }
    }

    /// Samples the output pins after a rising edge.
    ///
    /// The captured result is both queued for the scoreboard and returned.
    pub fn sample(&mut self, pins: &Pins, cycle: u64) -> Option<ObservedResult> {
        if !pins.done {
            return None;
        }
        let observed = ObservedResult {
            result: FloatValue::from_bits(pins.result),
            cycle,
        };
        trace!(monitor = %self.name, cycle, result = %observed.result, "output observed");
        self.total += 1;
        self.observed.push_back(observed);
        Some(observed)
    }

    /// Removes and returns captured results not yet consumed, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = ObservedResult> + '_ {
        self.observed.drain(..)
    }

    /// Captured results waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Results captured over the monitor's lifetime.
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
