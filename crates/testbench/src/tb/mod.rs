//! Self-checking testbench.
//!
//! This module implements the verification environment around the DUT:
//! 1. **Clock:** Period and edge bookkeeping ([`clock`]).
//! 2. **Transactions:** Expected and observed records ([`transaction`]).
//! 3. **Driver:** Operand and `start` handshake ([`driver`]).
//! 4. **Monitors:** Input and output pin sampling ([`monitor`]).
//! 5. **Scoreboard:** In-order reconciliation ([`scoreboard`]).
//! 6. **Orchestrator:** The cycle loop and run lifecycle ([`testbench`]).

/// Clock generator.
pub mod clock;

/// Input driver and `start` handshake protocols.
pub mod driver;

/// Input and output monitors.
pub mod monitor;

/// Expected-vs-observed reconciliation.
pub mod scoreboard;

/// Testbench orchestrator.
pub mod testbench;

/// Transaction records and the expected queue.
pub mod transaction;

pub use clock::Clock;
pub use driver::{InputDriver, StartProtocol};
pub use monitor::{InputMonitor, OutputMonitor, TransactionListener};
pub use scoreboard::{InterfaceId, Mismatch, MismatchReason, Scoreboard, ScoreboardResult};
pub use testbench::{
    ModelListener, TestReport, Testbench, TestbenchState, case_name, run_directed, run_test,
};
pub use transaction::{ExpectedQueue, ObservedResult, Transaction};
