use instant::Instant;

/// Which stage of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    SpatialRebuild = 0,
    Perception = 1,
    Decision = 2,
    Kinetic = 3,
    Needs = 4,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 5] = [
        Self::SpatialRebuild,
        Self::Perception,
        Self::Decision,
        Self::Kinetic,
        Self::Needs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::SpatialRebuild => "Spatial",
            Self::Perception => "Perception",
            Self::Decision => "Decision",
            Self::Kinetic => "Kinetic",
            Self::Needs => "Needs",
        }
    }
}

const PHASES: usize = SystemPhase::ALL.len();

/// Per-stage timing: last tick's raw duration plus an exponential moving
/// average. Observational only.
#[derive(Debug, Clone)]
pub struct SystemTimers {
    /// Raw duration of each phase in the most recent tick (microseconds).
    pub last_us: [f64; PHASES],
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; PHASES],
    /// Timestamp when `begin()` was called.
    start: Instant,
    samples: u64,
}

const EMA_ALPHA: f64 = 0.1;

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            last_us: [0.0; PHASES],
            durations_us: [0.0; PHASES],
            start: Instant::now(),
            samples: 0,
        }
    }

    /// Call before a system runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a system finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    /// Record a measured duration. The first tick seeds the average.
    pub fn record(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.last_us[idx] = elapsed_us;
        self.durations_us[idx] = if self.samples == 0 {
            elapsed_us
        } else {
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA
        };
        if phase == SystemPhase::Needs {
            self.samples += 1;
        }
    }

    /// Run `f` between `begin()` and `end(phase)`.
    pub fn time<R>(&mut self, phase: SystemPhase, f: impl FnOnce() -> R) -> R {
        self.begin();
        let out = f();
        self.end(phase);
        out
    }

    /// Number of fully timed ticks.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Sum of the last tick's phase durations (microseconds).
    pub fn last_total_us(&self) -> f64 {
        self.last_us.iter().sum()
    }

    /// Sum of all smoothed phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// Log one line per phase plus the total.
    pub fn report(&self) {
        log::info!("=== PERFORMANCE REPORT ===");
        for phase in SystemPhase::ALL {
            let idx = phase as usize;
            log::info!(
                "{:<11} last: {:>9.3}ms | avg: {:>9.3}ms",
                phase.label(),
                self.last_us[idx] / 1000.0,
                self.durations_us[idx] / 1000.0,
            );
        }
        let total_ms = self.last_total_us() / 1000.0;
        let tps = if total_ms > 0.0 { 1000.0 / total_ms } else { 0.0 };
        log::info!("TOTAL: {total_ms:.3}ms | {tps:.0} ticks/s");
    }
}
