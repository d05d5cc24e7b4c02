use crate::config::NeedsConfig;
use crate::ecs::components::Action;
use crate::ecs::store::EntityStore;

/// Advance hunger, energy, safety and curiosity for every living entity.
/// Every value is clamped into [0, 1] afterwards.
pub fn update(store: &mut EntityStore, dt: f32, config: &NeedsConfig, rng: &mut fastrand::Rng) {
    let EntityStore {
        perception,
        needs,
        actions,
        health,
        ..
    } = store;

    for i in 0..health.alive.len() {
        if !health.alive[i] {
            continue;
        }
        let action = actions.current[i];

        let mut hunger = (needs.hunger[i] + config.hunger_rate * dt).min(1.0);
        let energy = match action {
            Action::Sleep => needs.energy[i] + config.sleep_recovery * dt,
            Action::Idle
            | Action::MoveToTarget
            | Action::Eat
            | Action::Flee
            | Action::Attack
            | Action::Explore => needs.energy[i] - config.energy_drain * dt,
        };
        if action == Action::Eat {
            hunger -= config.eat_rate * dt;
        }

        // Crowding reads as danger.
        let safety = if perception.visible_count[i] > config.crowding_threshold {
            needs.safety[i] - config.safety_loss * dt
        } else {
            needs.safety[i] + config.safety_recovery * dt
        };

        let drift = rng.i32(-50..50) as f32 * config.curiosity_step * dt;
        let curiosity = needs.curiosity[i] + drift;

        needs.hunger[i] = hunger.clamp(0.0, 1.0);
        needs.energy[i] = energy.clamp(0.0, 1.0);
        needs.safety[i] = safety.clamp(0.0, 1.0);
        needs.curiosity[i] = curiosity.clamp(0.0, 1.0);
    }
}
