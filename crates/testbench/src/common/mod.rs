//! Common types and constants shared by every testbench component.
//!
//! This module provides the fundamental building blocks of the harness:
//! 1. **Constants:** IEEE-754 binary32 field masks and clock defaults.
//! 2. **Error Handling:** Harness misuse, configuration, and value errors.

/// IEEE-754 binary32 layout and simulation constants.
pub mod constants;

/// Error types for harness misuse and invalid values.
pub mod error;

pub use error::{FloatError, TestbenchError};
