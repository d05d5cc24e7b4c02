use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use instant::Instant;

use crate::config::SimConfig;
use crate::debug::ring::RingBuffer;
use crate::diagnostics::chaos::FaultInjector;
use crate::diagnostics::replay::ReplayLogger;
use crate::diagnostics::validator::{self, EntityReport, ValidationError};
use crate::ecs::components::EntityId;
use crate::sim::Simulation;
use crate::stats::ActionCounts;

/// How many tick durations to keep for the periodic report.
const TICK_HISTORY_LEN: usize = 300;

// ---------------------------------------------------------------------------
// Tick timing
// ---------------------------------------------------------------------------

struct TickStats {
    /// Wall-clock milliseconds per tick, pipeline only.
    history: RingBuffer<f64>,
}

impl TickStats {
    fn new() -> Self {
        Self {
            history: RingBuffer::new(TICK_HISTORY_LEN),
        }
    }

    fn record(&mut self, ms: f64) {
        self.history.push(ms);
    }

    fn log(&self) {
        if let Some(w) = self.history.stats() {
            log::info!(
                "Tick time over last {}: avg {:.3}ms | min {:.3}ms | max {:.3}ms",
                self.history.len(),
                w.mean,
                w.min,
                w.max,
            );
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub entities: usize,
    pub alive: usize,
    pub replay_frames: u64,
    pub faults: usize,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Drives a simulation for a fixed number of ticks with the configured
/// collaborators: fault injection, validation, replay logging, profiling.
struct App {
    sim: Simulation,
    replay: Option<ReplayLogger<BufWriter<File>>>,
    chaos: FaultInjector,
    tick_stats: TickStats,
    faults: usize,
}

impl App {
    fn new(config: SimConfig) -> Result<Self> {
        let diag = config.diagnostics.clone();
        let replay = if diag.replay {
            let path = Path::new(&diag.replay_path);
            let logger = ReplayLogger::create(path)
                .with_context(|| format!("creating replay log {}", path.display()))?;
            Some(logger)
        } else {
            None
        };
        let chaos = FaultInjector::new(diag.chaos_probability, config.chaos_seed(), diag.chaos);
        let sim = Simulation::new(config).context("building simulation")?;

        Ok(Self {
            sim,
            replay,
            chaos,
            tick_stats: TickStats::new(),
            faults: 0,
        })
    }

    fn run(&mut self) -> Result<RunSummary> {
        let config = self.sim.config().clone();
        let diag = &config.diagnostics;

        log::info!(
            "Starting simulation with {} entities for {} ticks (dt = {}, seed = {})",
            self.sim.store().len(),
            config.simulation.ticks,
            config.simulation.dt,
            config.simulation.seed,
        );
        log::info!(
            "Chaos: {} | Replay: {} | Profiling: {} | Validation: {}",
            on_off(diag.chaos),
            on_off(diag.replay),
            on_off(diag.profiling),
            on_off(diag.validate),
        );

        if diag.validate {
            self.check().context("initial state is invalid")?;
        }
        self.log_entity(EntityId(0));

        let started = Instant::now();
        for _ in 0..config.simulation.ticks {
            let tick_start = Instant::now();
            self.sim.step();
            self.tick_stats
                .record(tick_start.elapsed().as_secs_f64() * 1000.0);

            if self.chaos.is_enabled() {
                let events = self.chaos.maybe_corrupt(self.sim.store_mut(), &config.world);
                self.faults += events.len();
                if let Some(replay) = self.replay.as_mut() {
                    for event in &events {
                        replay
                            .log_event(event.kind.event_name(), event.entity)
                            .context("writing replay event")?;
                    }
                }
            }

            if diag.validate {
                let tick = self.sim.tick_count();
                self.check()
                    .with_context(|| format!("state validation failed at tick {tick}"))?;
            }

            if let Some(replay) = self.replay.as_mut() {
                replay
                    .log_frame(self.sim.store())
                    .context("writing replay frame")?;
            }

            // Report on the first tick and every interval after.
            if (self.sim.tick_count() - 1) % diag.stats_interval == 0 {
                log::info!(
                    "Tick {}: {}",
                    self.sim.tick_count(),
                    ActionCounts::census(self.sim.store())
                );
                if diag.profiling {
                    self.sim.timers().report();
                    self.tick_stats.log();
                }
            }
        }

        let mut replay_frames = 0;
        if let Some(replay) = self.replay.as_mut() {
            replay.flush().context("flushing replay log")?;
            replay_frames = replay.frame();
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let ticks = self.sim.tick_count();
        let entities = self.sim.store().len();
        log::info!("Simulation complete");
        log::info!("Total ticks: {ticks} | total time: {elapsed_ms:.1}ms");
        if ticks > 0 {
            let avg_ms = elapsed_ms / ticks as f64;
            let tps = if elapsed_ms > 0.0 {
                ticks as f64 * 1000.0 / elapsed_ms
            } else {
                0.0
            };
            log::info!("Average tick: {avg_ms:.3}ms | {tps:.0} ticks/s");
        }
        log::info!("Entity-ticks processed: {}", entities as u64 * ticks);
        self.log_entity(EntityId(0));

        Ok(RunSummary {
            ticks,
            entities,
            alive: self.sim.store().alive_count(),
            replay_frames,
            faults: self.faults,
        })
    }

    /// Validate, logging every violation and the offending entity.
    fn check(&self) -> Result<(), ValidationError> {
        let store = self.sim.store();
        validator::validate(store).inspect_err(|err| {
            for violation in &err.violations {
                log::error!("[VALIDATION ERROR] {violation}");
            }
            let culprit = err.violations.iter().find_map(|v| v.entity());
            self.log_entity(culprit.unwrap_or(EntityId(0)));
        })
    }

    fn log_entity(&self, id: EntityId) {
        if let Some(report) = EntityReport::new(self.sim.store(), id) {
            log::info!("\n{report}");
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ENABLED"
    } else {
        "DISABLED"
    }
}

/// Run a full simulation. A validation failure stops the run and is
/// returned as an error.
pub fn run(config: SimConfig) -> Result<RunSummary> {
    let mut app = App::new(config)?;
    app.run()
}
