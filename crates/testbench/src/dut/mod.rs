//! Device-under-test boundary.
//!
//! The harness never looks inside the multiplier. It sees a set of named
//! signals ([`Pins`]) and a single clocked entry point
//! ([`Dut::on_rising_edge`]) that evaluates the circuit on each rising clock
//! edge:
//!
//! | Signal   | Direction | Meaning                              |
//! |----------|-----------|--------------------------------------|
//! | `clk`    | harness   | Clock level                          |
//! | `a`, `b` | harness   | Operand encodings                    |
//! | `start`  | harness   | Submits `a`, `b` on its rising edge  |
//! | `done`   | DUT       | `result` is valid this cycle         |
//! | `result` | DUT       | Product encoding                     |
//!
//! A behavioral pipelined implementation lives in [`pipelined`], with fault
//! injection in [`faults`] for exercising the checker itself.

/// Fault injection modes for the behavioral multiplier.
pub mod faults;

/// Behavioral pipelined multiplier.
pub mod pipelined;

pub use faults::FaultMode;
pub use pipelined::PipelinedMultiplier;

/// DUT-visible signal state.
///
/// The single source of truth for circuit state as seen by the harness. The
/// driver writes the input half in the drive phase; the DUT writes the output
/// half on the rising edge; monitors only read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pins {
    /// Clock level.
    pub clk: bool,
    /// Operand A encoding.
    pub a: u32,
    /// Operand B encoding.
    pub b: u32,
    /// Start strobe.
    pub start: bool,
    /// Result-valid strobe.
    pub done: bool,
    /// Result encoding.
    pub result: u32,
}

/// A clocked floating-point multiplier.
pub trait Dut {
    /// Evaluates one rising clock edge.
    ///
    /// Reads `a`, `b` and `start` as driven before the edge and updates
    /// `done` and `result`. Must not modify the input signals.
    fn on_rising_edge(&mut self, pins: &mut Pins);

    /// Instance name used in log output.
    fn name(&self) -> &str {
        "dut"
    }
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn on_rising_edge(&mut self, pins: &mut Pins) {
        (**self).on_rising_edge(pins);
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
