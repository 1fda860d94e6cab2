//! Clock generator.
//!
//! Holds the clock level and counts rising edges. One cycle is one rising
//! edge; simulated time advances by half a period on every transition.

/// Free-running clock owned by the orchestrator.
#[derive(Debug, Clone)]
pub struct Clock {
    period_ps: u64,
    level: bool,
    cycles: u64,
    time_ps: u64,
}

impl Clock {
    /// Creates a clock, initially low at time zero.
    pub const fn new(period_ps: u64) -> Self {
        Self {
            period_ps,
            level: false,
            cycles: 0,
            time_ps: 0,
        }
    }

    /// Raises the clock and returns the index of this rising edge.
    pub const fn rise(&mut self) -> u64 {
        let edge = self.cycles;
        self.level = true;
        self.time_ps += self.period_ps / 2;
        self.cycles += 1;
        edge
    }

    /// Lowers the clock, completing the cycle.
    pub const fn fall(&mut self) {
        self.level = false;
        self.time_ps += self.period_ps - self.period_ps / 2;
    }

    /// Current clock level.
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Rising edges so far.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Simulated time in picoseconds.
    pub const fn time_ps(&self) -> u64 {
        self.time_ps
    }

    /// Clock period in picoseconds.
    pub const fn period_ps(&self) -> u64 {
        self.period_ps
    }
}
