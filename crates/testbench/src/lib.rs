//! IEEE-754 binary32 multiplier verification library.
//!
//! This crate implements a self-checking, clock-driven testbench for a
//! hardware floating-point multiplier with the following:
//! 1. **Values:** Categorized binary32 values and NaN handling.
//! 2. **Model:** A reference multiply with rounding modes and exception flags.
//! 3. **Stimulus:** Seeded per-category random operand generation.
//! 4. **DUT:** The pin-level device boundary and a behavioral pipelined multiplier.
//! 5. **Testbench:** Clock, driver, monitors, scoreboard and the run lifecycle.
//! 6. **Suite:** The 36-case category matrix, configuration and statistics.

/// Common types and constants (binary32 layout, errors).
pub mod common;
/// Testbench configuration (defaults, hierarchical config structures, JSON loading).
pub mod config;
/// Device-under-test boundary and the behavioral multiplier.
pub mod dut;
/// Binary32 values, categories and NaN handling.
pub mod float;
/// Reference multiply model (rounding modes, exception flags).
pub mod model;
/// Run statistics collection and reporting.
pub mod stats;
/// Random operand generation.
pub mod stimulus;
/// Test matrix and suite runner.
pub mod suite;
/// Clocked verification components and the orchestrator.
pub mod tb;

/// Harness error type; returned by every fallible operation.
pub use crate::common::error::TestbenchError;
/// Root configuration type; use `TestbenchConfig::default()` or load from JSON.
pub use crate::config::TestbenchConfig;
/// Pin-level device interface implemented by every DUT.
pub use crate::dut::{Dut, Pins};
/// Categorized binary32 value.
pub use crate::float::{FloatCategory, FloatValue};
/// Reference multiply model.
pub use crate::model::ReferenceModel;
/// Per-category operand generator.
pub use crate::stimulus::{StimulusGenerator, StimulusKind};
/// Clock-driven harness around one DUT.
pub use crate::tb::{TestReport, Testbench};
