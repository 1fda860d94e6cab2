//! Input driver.
//!
//! Drives queued operand pairs onto `a`, `b` and `start` in the drive phase of
//! each cycle (clock low, before the rising edge). Two handshakes are
//! supported:
//!
//! - [`StartProtocol::Pulse`]: `start` is high for exactly one cycle per
//!   operation and is always followed by at least one low cycle, so every
//!   operation is a distinct rising edge of `start`.
//! - [`StartProtocol::Hold`]: `start` stays high until `done` is seen, then
//!   drops for at least one cycle. Only one operation is ever outstanding.
//!
//! The driver counts outstanding operations and never exceeds its in-flight
//! capacity. An operation whose `done` has not arrived within the completion
//! timeout is abandoned. It keeps its slot for one more timeout window: a
//! late `done` retires it rather than the next operation, and only then is
//! the slot freed. If nothing arrives the scoreboard reports it as missing.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::common::error::{Result, TestbenchError};
use crate::dut::Pins;
use crate::float::FloatValue;

/// How `start` submits an operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartProtocol {
    /// Single-cycle pulse per operation.
    #[default]
    Pulse,
    /// Level held until `done`.
    Hold,
}

impl fmt::Display for StartProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pulse => f.write_str("pulse"),
            Self::Hold => f.write_str("hold"),
        }
    }
}

impl FromStr for StartProtocol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pulse" => Ok(Self::Pulse),
            "hold" => Ok(Self::Hold),
            _ => Err(format!("unknown start protocol '{s}' (expected pulse or hold)")),
        }
    }
}

/// Driver lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriverState {
    Idle,
    Active,
    Stopped,
}

/// Clock-synchronized operand driver.
#[derive(Debug, Clone)]
pub struct InputDriver {
    protocol: StartProtocol,
    capacity: usize,
    completion_timeout: u64,
    state: DriverState,
    pending: VecDeque<(FloatValue, FloatValue)>,
    /// Issue cycle of each outstanding operation, oldest first.
    in_flight: VecDeque<u64>,
    /// Issue cycle of each abandoned operation that may still complete.
    late: VecDeque<u64>,
    start_high: bool,
    issued: u64,
    abandoned: u64,
}

impl InputDriver {
    /// Creates an idle driver.
    ///
    /// `max_in_flight` is clamped to at least one, and to exactly one for
    /// [`StartProtocol::Hold`].
    pub fn new(protocol: StartProtocol, max_in_flight: usize, completion_timeout: u64) -> Self {
        let capacity = match protocol {
            StartProtocol::Pulse => max_in_flight.max(1),
            StartProtocol::Hold => 1,
        };
        Self {
            protocol,
            capacity,
            completion_timeout,
            state: DriverState::Idle,
            pending: VecDeque::new(),
            in_flight: VecDeque::with_capacity(capacity),
            late: VecDeque::new(),
            start_high: false,
            issued: 0,
            abandoned: 0,
        }
    }

    /// Queues an operand pair for submission.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::AlreadyStopped`] once the driver has been
    /// stopped: the pair would never be driven.
    pub fn enqueue(&mut self, a: FloatValue, b: FloatValue) -> Result<()> {
        if self.state == DriverState::Stopped {
            return Err(TestbenchError::AlreadyStopped);
        }
        self.pending.push_back((a, b));
        Ok(())
    }

    /// Begins driving queued stimulus.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::AlreadyStarted`] if running and
    /// [`TestbenchError::AlreadyStopped`] if the driver was already stopped.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            DriverState::Idle => {
                self.state = DriverState::Active;
                debug!(protocol = %self.protocol, capacity = self.capacity, "driver started");
                Ok(())
            }
            DriverState::Active => Err(TestbenchError::AlreadyStarted),
            DriverState::Stopped => Err(TestbenchError::AlreadyStopped),
        }
    }

    /// Stops issuing new operations.
    ///
    /// In-flight signal state is left alone: a held `start` is still released
    /// when its `done` arrives.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::NotStarted`] before `start()` and
    /// [`TestbenchError::AlreadyStopped`] on a second call.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            DriverState::Idle => Err(TestbenchError::NotStarted),
            DriverState::Active => {
                self.state = DriverState::Stopped;
                debug!(
                    pending = self.pending.len(),
                    in_flight = self.in_flight.len(),
                    "driver stopped"
                );
                Ok(())
            }
            DriverState::Stopped => Err(TestbenchError::AlreadyStopped),
        }
    }

    /// Drive phase of one cycle.
    ///
    /// `cycle` is the index of the rising edge that follows. `pins.done` still
    /// holds the value sampled on the previous edge.
    pub fn drive(&mut self, pins: &mut Pins, cycle: u64) {
        if pins.done {
            if let Some(issued_at) = self.late.pop_front() {
                warn!(issued_at, cycle, "abandoned operation completed late");
            } else if self.in_flight.pop_front().is_none() {
                warn!(cycle, "done asserted with no operation outstanding");
            }
        }
        self.expire(cycle);

        if self.start_high {
            let release = match self.protocol {
                StartProtocol::Pulse => true,
                StartProtocol::Hold => self.in_flight.is_empty(),
            };
            if release {
                pins.start = false;
                self.start_high = false;
            }
            return;
        }

        if self.state != DriverState::Active || self.occupied() >= self.capacity {
            return;
        }
        if let Some((a, b)) = self.pending.pop_front() {
            pins.a = a.to_bits();
            pins.b = b.to_bits();
            pins.start = true;
            self.start_high = true;
            self.in_flight.push_back(cycle);
            self.issued += 1;
            debug!(cycle, a = %a, b = %b, "driving operands");
        }
    }

    /// Abandons operations that have waited longer than the completion
    /// timeout, and frees the slots of abandoned operations after a second
    /// timeout window.
    fn expire(&mut self, cycle: u64) {
        while let Some(&issued_at) = self.late.front() {
            if cycle.saturating_sub(issued_at) <= self.completion_timeout.saturating_mul(2) {
                break;
            }
            let _ = self.late.pop_front();
            debug!(issued_at, cycle, "abandoned operation slot released");
        }
        while let Some(&issued_at) = self.in_flight.front() {
            if cycle.saturating_sub(issued_at) <= self.completion_timeout {
                break;
            }
            let _ = self.in_flight.pop_front();
            self.late.push_back(issued_at);
            self.abandoned += 1;
            warn!(issued_at, cycle, "operation never completed, abandoning");
        }
    }

    /// Slots held by outstanding and abandoned-but-unreleased operations.
    fn occupied(&self) -> usize {
        self.in_flight.len() + self.late.len()
    }

    /// Returns true when nothing is queued or outstanding.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.occupied() == 0 && !self.start_high
    }

    /// Removes and returns the operand pairs that were never driven.
    pub fn take_pending(&mut self) -> Vec<(FloatValue, FloatValue)> {
        self.pending.drain(..).collect()
    }

    /// Handshake protocol.
    pub const fn protocol(&self) -> StartProtocol {
        self.protocol
    }

    /// Effective in-flight capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Operand pairs not yet driven.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Operations driven and not yet completed or abandoned.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Operations driven so far.
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    /// Operations abandoned after the completion timeout.
    pub const fn abandoned(&self) -> u64 {
        self.abandoned
    }
}
