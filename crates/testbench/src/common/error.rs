//! Error definitions.
//!
//! This module defines the error handling for the harness. It provides:
//! 1. **Value Errors:** Rejected field combinations when building a `FloatValue`.
//! 2. **Harness Errors:** Misuse of the driver or the orchestrator state machine.
//! 3. **Configuration Errors:** Invalid or unreadable testbench configuration.
//!
//! DUT defects are never reported through these types; they are recorded by
//! the scoreboard and surfaced in the final report.

use thiserror::Error;

use crate::tb::testbench::TestbenchState;

/// Rejected field combination for a floating-point category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FloatError {
    /// A normal number needs a biased exponent in `1..=254`.
    #[error("exponent {0} is outside the normal range 1..=254")]
    ExponentOutOfRange(u8),

    /// A denormal number needs a nonzero mantissa.
    #[error("denormal mantissa must be nonzero")]
    ZeroDenormalMantissa,

    /// A NaN needs a nonzero payload, otherwise it encodes infinity.
    #[error("NaN payload must be nonzero")]
    ZeroNanPayload,

    /// The mantissa has bits set above bit 22.
    #[error("mantissa {0:#x} does not fit in 23 bits")]
    MantissaTooWide(u32),
}

/// Harness-level failures that abort a scenario.
///
/// These indicate a bug in how the testbench is being driven, not a defect
/// in the device under test.
#[derive(Debug, Error)]
pub enum TestbenchError {
    /// `start()` was called on a driver that is already running.
    #[error("input driver already started")]
    AlreadyStarted,

    /// The driver was stopped, or the clock advanced, before `start()`.
    #[error("testbench not started")]
    NotStarted,

    /// `stop()` was called twice, or stimulus arrived after the run ended.
    #[error("testbench already stopped")]
    AlreadyStopped,

    /// The orchestrator was asked to move between incompatible states.
    #[error("invalid testbench transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the testbench was in.
        from: TestbenchState,
        /// State that was requested.
        to: TestbenchState,
    },

    /// Stimulus or configuration value was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration JSON could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("configuration file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the harness.
pub type Result<T> = std::result::Result<T, TestbenchError>;
