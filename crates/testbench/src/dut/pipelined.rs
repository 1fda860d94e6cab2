//! Behavioral pipelined multiplier.
//!
//! Stands in for the HDL circuit when no simulator is attached. It accepts an
//! operation on every rising edge of `start`, carries it through `latency`
//! register stages, and raises `done` for exactly one cycle when the result
//! leaves the last stage. With `latency == 0` the result appears on the same
//! edge that accepted the operands.
//!
//! The arithmetic uses the host's binary64 multiply followed by a single
//! rounding step, so it shares no special-case logic with the reference model.

use std::collections::VecDeque;

use tracing::trace;

use super::faults::FaultMode;
use super::{Dut, Pins};
use crate::common::constants::SIGN_MASK;
use crate::float::{FloatCategory, FloatValue};
use crate::model::rounding_modes::RoundingMode;

/// One operation travelling through the pipeline.
#[derive(Clone, Copy, Debug)]
struct Slot {
    result: u32,
    swapped: bool,
}

/// Behavioral multi-cycle binary32 multiplier.
#[derive(Debug, Clone)]
pub struct PipelinedMultiplier {
    name: String,
    latency: usize,
    rounding: RoundingMode,
    fault: FaultMode,
    /// Stage registers, newest at the front.
    stages: VecDeque<Option<Slot>>,
    prev_start: bool,
    accepted: u64,
    completed: u64,
}

impl PipelinedMultiplier {
    /// Creates a correct multiplier with the given pipeline depth.
    pub fn new(latency: usize) -> Self {
        Self {
            name: String::from("fpmul"),
            latency,
            rounding: RoundingMode::Rne,
            fault: FaultMode::None,
            stages: VecDeque::with_capacity(latency + 1),
            prev_start: false,
            accepted: 0,
            completed: 0,
        }
    }

    /// Injects a fault.
    #[must_use]
    pub const fn with_fault(mut self, fault: FaultMode) -> Self {
        self.fault = fault;
        self
    }

    /// Selects the rounding mode of the arithmetic.
    #[must_use]
    pub const fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Renames the instance for log output.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of register stages between accept and `done`.
    pub const fn latency(&self) -> usize {
        self.latency
    }

    /// Injected fault.
    pub const fn fault(&self) -> FaultMode {
        self.fault
    }

    /// Operations accepted so far.
    pub const fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Operations currently inside the pipeline.
    pub fn in_flight(&self) -> usize {
        self.stages.iter().flatten().count()
    }

    /// Computes the product encoding, including input and result faults.
    fn evaluate(&self, a: u32, b: u32) -> u32 {
        let (a, b) = if self.fault == FaultMode::FlushDenormals {
            (flush_denormal(a), flush_denormal(b))
        } else {
            (a, b)
        };
        let fa = f64::from(f32::from_bits(a));
        let fb = f64::from(f32::from_bits(b));

        if self.fault == FaultMode::InvalidAsZero
            && ((fa.is_infinite() && fb == 0.0) || (fa == 0.0 && fb.is_infinite()))
        {
            return (a ^ b) & SIGN_MASK;
        }

        let result = self.rounding.round_to_f32(fa * fb).to_bits();
        match self.fault {
            FaultMode::FlushDenormals => flush_denormal(result),
            FaultMode::SignFlip => result ^ SIGN_MASK,
            _ => result,
        }
    }

    /// Applies output-side faults to a result leaving the pipeline.
    fn retire(&mut self, slot: Slot) -> Option<u32> {
        self.completed += 1;
        if let FaultMode::DropEvery(n) = self.fault {
            if n > 0 && self.completed % u64::from(n) == 0 {
                trace!(dut = %self.name, result = slot.result, "dropping result");
                return None;
            }
        }
        Some(slot.result)
    }
}

impl Dut for PipelinedMultiplier {
    fn on_rising_edge(&mut self, pins: &mut Pins) {
        let accept = pins.start && !self.prev_start;
        self.prev_start = pins.start;

        let mut entering = None;
        if accept {
            self.accepted += 1;
            let mut slot = Slot {
                result: self.evaluate(pins.a, pins.b),
                swapped: false,
            };
            if self.fault == FaultMode::SwapAdjacent {
                // Exchange results with the youngest unswapped operation in flight.
                if let Some(partner) = self.stages.iter_mut().flatten().find(|s| !s.swapped) {
                    std::mem::swap(&mut partner.result, &mut slot.result);
                    partner.swapped = true;
                    slot.swapped = true;
                }
            }
            entering = Some(slot);
        }
        self.stages.push_front(entering);

        let leaving = if self.stages.len() > self.latency {
            self.stages.pop_back().flatten()
        } else {
            None
        };

        match leaving.and_then(|slot| self.retire(slot)) {
            Some(result) => {
                pins.done = true;
                pins.result = result;
            }
            None => pins.done = false,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replaces a denormal encoding with zero of the same sign.
fn flush_denormal(bits: u32) -> u32 {
    if FloatValue::from_bits(bits).category() == FloatCategory::Denormal {
        bits & SIGN_MASK
    } else {
        bits
    }
}
