use fpmul_tb::config::TestbenchConfig;
use fpmul_tb::dut::{FaultMode, PipelinedMultiplier};
use fpmul_tb::float::FloatValue;
use fpmul_tb::tb::{StartProtocol, TestReport, run_directed};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per process; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Fluent builder over [`TestbenchConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: TestbenchConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latency(mut self, latency: usize) -> Self {
        self.config.dut.latency = latency;
        self
    }

    pub fn fault(mut self, fault: FaultMode) -> Self {
        self.config.dut.fault = fault;
        self
    }

    pub fn protocol(mut self, protocol: StartProtocol) -> Self {
        self.config.driver.protocol = protocol;
        self
    }

    pub fn max_in_flight(mut self, n: usize) -> Self {
        self.config.driver.max_in_flight = n;
        self
    }

    pub fn completion_timeout(mut self, cycles: u64) -> Self {
        self.config.driver.completion_timeout = cycles;
        self
    }

    pub fn transactions(mut self, n: usize) -> Self {
        self.config.run.transactions_per_case = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.run.seed = seed;
        self
    }

    pub fn max_cycles(mut self, cycles: u64) -> Self {
        self.config.run.max_cycles = cycles;
        self
    }

    pub fn build(self) -> TestbenchConfig {
        self.config
    }
}

/// Behavioral DUT matching `config.dut`.
pub fn dut_for(config: &TestbenchConfig) -> PipelinedMultiplier {
    fpmul_tb::suite::default_dut(config)
}

/// Converts native pairs into operand values.
pub fn pairs(values: &[(f32, f32)]) -> Vec<(FloatValue, FloatValue)> {
    values
        .iter()
        .map(|&(a, b)| (FloatValue::from_f32(a), FloatValue::from_f32(b)))
        .collect()
}

/// Runs explicit operand pairs through the behavioral DUT described by `config`.
pub fn run_pairs(config: &TestbenchConfig, values: &[(f32, f32)]) -> TestReport {
    init_tracing();
    run_directed(dut_for(config), config, "directed", pairs(values)).unwrap()
}

/// Runs raw operand encodings through the behavioral DUT described by `config`.
pub fn run_bits(config: &TestbenchConfig, values: &[(u32, u32)]) -> TestReport {
    init_tracing();
    let operands = values
        .iter()
        .map(|&(a, b)| (FloatValue::from_bits(a), FloatValue::from_bits(b)));
    run_directed(dut_for(config), config, "directed", operands).unwrap()
}
