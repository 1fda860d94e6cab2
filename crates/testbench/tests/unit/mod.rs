//! # Unit Components
//!
//! Tests for each harness component, from binary32 values up to the full
//! test matrix.


/// Input driver handshakes and lifecycle misuse.
pub mod driver;




/// End-to-end scenarios against correct and faulty DUTs.
pub mod scenarios;



/// The 36-case test matrix.
pub mod suite;

/// Orchestrator lifecycle and cycle loop, including a mocked DUT.
pub mod testbench;
