pub mod decision;
pub mod kinetic;
pub mod needs;
pub mod perception;
pub mod spatial;

use crate::config::SimConfig;
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::ecs::store::EntityStore;
use crate::spatial::SpatialGrid;

/// Run all pipeline stages for one fixed tick, in dependency order.
///
/// Stages are only timed when `diagnostics.profiling` is set.
pub fn tick(
    store: &mut EntityStore,
    grid: &mut SpatialGrid,
    config: &SimConfig,
    rng: &mut fastrand::Rng,
    timers: &mut SystemTimers,
) {
    let dt = config.simulation.dt;
    let mut timers = config.diagnostics.profiling.then_some(timers);

    // 1. Rebuild spatial grid from living entities
    stage(&mut timers, SystemPhase::SpatialRebuild, || spatial::rebuild(store, grid));

    // 2. Perception: stimulus buffers + visible counts
    stage(&mut timers, SystemPhase::Perception, || perception::update(store, grid));

    // 3. Utility arbitration: action, score, target
    stage(&mut timers, SystemPhase::Decision, || {
        decision::update(store, &config.decision, rng)
    });

    // 4. Steering + integration (speed cap, world clamp)
    stage(&mut timers, SystemPhase::Kinetic, || {
        kinetic::integrate(store, dt, &config.kinetic, &config.world)
    });

    // 5. Drives
    stage(&mut timers, SystemPhase::Needs, || {
        needs::update(store, dt, &config.needs, rng)
    });
}

fn stage(timers: &mut Option<&mut SystemTimers>, phase: SystemPhase, f: impl FnOnce()) {
    match timers {
        Some(timers) => timers.time(phase, f),
        None => f(),
    }
}
