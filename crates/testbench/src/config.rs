//! Configuration system for the testbench.
//!
//! This module defines every knob of a verification run. It provides:
//! 1. **Defaults:** Baseline clock, handshake, run-length and DUT constants.
//! 2. **Structures:** Hierarchical config for clock, driver, run, model and DUT.
//! 3. **Loading:** JSON parsing from strings or files, and validation.
//!
//! Every field is optional in JSON; missing fields take the default below.
//!
//! ```
//! use fpmul_tb::config::TestbenchConfig;
//!
//! let config = TestbenchConfig::from_json_str(r#"{ "dut": { "latency": 5 } }"#).unwrap();
//! assert_eq!(config.dut.latency, 5);
//! assert_eq!(config.clock.period_ps, 10_000);
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{Result, TestbenchError};
use crate::dut::FaultMode;
use crate::model::rounding_modes::RoundingMode;
use crate::tb::driver::StartProtocol;

/// Default configuration constants.
mod defaults {
    use crate::common::constants::DEFAULT_CLOCK_PERIOD_PS;

    /// Clock period in picoseconds (100 MHz).
    pub const CLOCK_PERIOD_PS: u64 = DEFAULT_CLOCK_PERIOD_PS;

    /// Outstanding operations the driver may have in flight.
    ///
    /// One means strictly non-overlapping submission.
    pub const MAX_IN_FLIGHT: usize = 1;

    /// Operand pairs driven per test case.
    pub const TRANSACTIONS_PER_CASE: usize = 16;

    /// Base seed of the stimulus generators.
    pub const SEED: u64 = 0x5EED_F9A1;

    /// Watchdog: cycles a single scenario may run before it is stopped.
    pub const MAX_CYCLES: u64 = 100_000;

    /// Cycles run after `stop()` before the scoreboard is finalized.
    pub const DRAIN_CYCLES: u64 = 1;

    /// Cycles the driver waits for `done` before abandoning an operation.
    pub const COMPLETION_TIMEOUT: u64 = 64;

    /// Pipeline depth of the behavioral multiplier.
    pub const DUT_LATENCY: usize = 3;
}

/// Clock generator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Full clock period in picoseconds.
    #[serde(default = "ClockConfig::default_period_ps")]
    pub period_ps: u64,
}

impl ClockConfig {
    fn default_period_ps() -> u64 {
        defaults::CLOCK_PERIOD_PS
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_ps: defaults::CLOCK_PERIOD_PS,
        }
    }
}

/// Input driver handshake settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// How `start` is asserted.
    #[serde(default)]
    pub protocol: StartProtocol,

    /// Maximum outstanding operations (ignored for `hold`, which is always one).
    #[serde(default = "DriverConfig::default_max_in_flight")]
    pub max_in_flight: usize,

    /// Cycles to wait for `done` before an operation is abandoned.
    #[serde(default = "DriverConfig::default_completion_timeout")]
    pub completion_timeout: u64,
}

impl DriverConfig {
    fn default_max_in_flight() -> usize {
        defaults::MAX_IN_FLIGHT
    }

    fn default_completion_timeout() -> u64 {
        defaults::COMPLETION_TIMEOUT
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            protocol: StartProtocol::default(),
            max_in_flight: defaults::MAX_IN_FLIGHT,
            completion_timeout: defaults::COMPLETION_TIMEOUT,
        }
    }
}

/// Scenario length and reproducibility settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Operand pairs per test case.
    #[serde(default = "RunConfig::default_transactions_per_case")]
    pub transactions_per_case: usize,

    /// Base seed; each case derives its own stream from it.
    #[serde(default = "RunConfig::default_seed")]
    pub seed: u64,

    /// Watchdog limit on cycles in the running phase.
    #[serde(default = "RunConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Cycles run after `stop()` so in-flight results are captured.
    #[serde(default = "RunConfig::default_drain_cycles")]
    pub drain_cycles: u64,
}

impl RunConfig {
    fn default_transactions_per_case() -> usize {
        defaults::TRANSACTIONS_PER_CASE
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    fn default_drain_cycles() -> u64 {
        defaults::DRAIN_CYCLES
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            transactions_per_case: defaults::TRANSACTIONS_PER_CASE,
            seed: defaults::SEED,
            max_cycles: defaults::MAX_CYCLES,
            drain_cycles: defaults::DRAIN_CYCLES,
        }
    }
}

/// Reference model settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    /// Rounding mode of the golden model.
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// Behavioral DUT settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DutConfig {
    /// Pipeline depth in cycles.
    #[serde(default = "DutConfig::default_latency")]
    pub latency: usize,

    /// Injected fault.
    #[serde(default)]
    pub fault: FaultMode,
}

impl DutConfig {
    fn default_latency() -> usize {
        defaults::DUT_LATENCY
    }
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            latency: defaults::DUT_LATENCY,
            fault: FaultMode::None,
        }
    }
}

/// Root configuration of a verification run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestbenchConfig {
    /// Clock generator.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Input driver.
    #[serde(default)]
    pub driver: DriverConfig,
    /// Scenario length and seeding.
    #[serde(default)]
    pub run: RunConfig,
    /// Reference model.
    #[serde(default)]
    pub model: ModelConfig,
    /// Behavioral DUT.
    #[serde(default)]
    pub dut: DutConfig,
}

impl TestbenchConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::Json`] for malformed JSON and
    /// [`TestbenchError::Config`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::Io`] if the file cannot be read, otherwise
    /// the errors of [`TestbenchConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every value can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`TestbenchError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.clock.period_ps < 2 {
            return Err(TestbenchError::Config(
                "clock.period_ps must be at least 2".to_string(),
            ));
        }
        if self.driver.max_in_flight == 0 {
            return Err(TestbenchError::Config(
                "driver.max_in_flight must be nonzero".to_string(),
            ));
        }
        if self.driver.completion_timeout == 0 {
            return Err(TestbenchError::Config(
                "driver.completion_timeout must be nonzero".to_string(),
            ));
        }
        if self.run.max_cycles == 0 {
            return Err(TestbenchError::Config(
                "run.max_cycles must be nonzero".to_string(),
            ));
        }
        if self.run.drain_cycles == 0 {
            return Err(TestbenchError::Config(
                "run.drain_cycles must be at least one full cycle".to_string(),
            ));
        }
        if let FaultMode::DropEvery(0) = self.dut.fault {
            return Err(TestbenchError::Config(
                "dut.fault drop_every needs a nonzero period".to_string(),
            ));
        }
        Ok(())
    }
}
