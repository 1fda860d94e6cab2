//! Run statistics.
//!
//! Counters collected by the testbench while a scenario runs, printable as a
//! short summary after the run.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// Rising edges simulated.
    pub cycles: u64,
    /// Simulated time in picoseconds.
    pub sim_time_ps: u64,
    /// Operations driven into the DUT.
    pub issued: u64,
    /// Results captured from the DUT.
    pub observed: u64,
    /// Operations abandoned after the completion timeout.
    pub abandoned: u64,
    /// Cycles with no operation outstanding and `start` low.
    pub idle_cycles: u64,
    /// Cycles spent in the draining phase.
    pub drain_cycles: u64,
    #[serde(skip)]
    start_time: Instant,
    /// Wall-clock time from creation to the last update.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            cycles: 0,
            sim_time_ps: 0,
            issued: 0,
            observed: 0,
            abandoned: 0,
            idle_cycles: 0,
            drain_cycles: 0,
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }
}

impl RunStats {
    /// Creates zeroed counters and starts the wall clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the wall-clock time elapsed so far.
    pub fn stop_clock(&mut self) {
        self.elapsed = self.start_time.elapsed();
    }

    /// Fraction of cycles with an operation in progress.
    pub fn utilization(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            (self.cycles - self.idle_cycles.min(self.cycles)) as f64 / self.cycles as f64
        }
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        println!("  Cycles:        {}", self.cycles);
        println!("  Sim time:      {:.3} ns", self.sim_time_ps as f64 / 1000.0);
        println!("  Issued:        {}", self.issued);
        println!("  Observed:      {}", self.observed);
        if self.abandoned > 0 {
            println!("  Abandoned:     {}", self.abandoned);
        }
        println!("  Utilization:   {:.2}%", self.utilization() * 100.0);
        println!("  Wall time:     {:.3} ms", self.elapsed.as_secs_f64() * 1000.0);
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
