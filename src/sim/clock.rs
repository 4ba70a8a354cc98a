use std::fmt;

/// Monotonic count of RK4 steps taken since the last reset.
///
/// Display-only: no physics reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    ticks: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Simulated time in simulation time units.
    pub fn sim_time(&self, dt: f64) -> f64 {
        self.ticks as f64 * dt
    }

    pub fn elapsed(&self, ticks_per_month: u64) -> ElapsedTime {
        ElapsedTime::from_ticks(self.ticks, ticks_per_month)
    }
}

// ---------------------------------------------------------------------------
// Calendar-style display
// ---------------------------------------------------------------------------

/// Elapsed time as shown to the user. Counting starts at month 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    pub months: u64,
}

impl ElapsedTime {
    pub fn from_ticks(ticks: u64, ticks_per_month: u64) -> Self {
        Self { months: 1 + ticks / ticks_per_month.max(1) }
    }

    pub fn years(&self) -> u64 {
        self.months / 12
    }

    pub fn month_of_year(&self) -> u64 {
        self.months % 12
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months < 12 {
            return write!(f, "Month: {}", self.months);
        }
        let (y, m) = (self.years(), self.month_of_year());
        let year_word = if y == 1 { "year" } else { "years" };
        let month_word = if m == 1 { "month" } else { "months" };
        write!(f, "{} {} and {} {}", y, year_word, m, month_word)
    }
}
