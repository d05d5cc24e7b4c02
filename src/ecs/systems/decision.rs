use glam::Vec3;

use crate::config::DecisionConfig;
use crate::ecs::components::Action;
use crate::ecs::store::EntityStore;
use crate::utility::{self, Behavior, ScoringContext, BEHAVIORS};

/// Score every behavior for each living entity and record the winner.
pub fn update(store: &mut EntityStore, config: &DecisionConfig, rng: &mut fastrand::Rng) {
    update_with(store, &BEHAVIORS, config, rng);
}

/// Same as [`update`] with an explicit behavior table.
pub fn update_with(
    store: &mut EntityStore,
    table: &[Behavior],
    config: &DecisionConfig,
    rng: &mut fastrand::Rng,
) {
    let EntityStore {
        transforms,
        needs,
        actions,
        health,
        stimulus,
        ..
    } = store;

    for i in 0..health.alive.len() {
        if !health.alive[i] {
            continue;
        }
        let visible = &stimulus.visible[i];
        let ctx = ScoringContext {
            needs: needs.levels(i),
            visible: visible.len(),
        };
        let choice = utility::arbitrate(table, &ctx);

        actions.current[i] = choice.action;
        actions.utility[i] = choice.utility;

        match choice.action {
            Action::Attack => {
                // First in traversal order, not nearest.
                let target = visible.first().copied();
                actions.target_entity[i] = target;
                if let Some(target) = target {
                    actions.target_position[i] = transforms.position[target.index()];
                }
            }
            Action::Explore => {
                actions.target_entity[i] = None;
                let here = transforms.position[i];
                actions.target_position[i] = Vec3::new(
                    here.x + jitter(rng, config.explore_jitter),
                    here.y + jitter(rng, config.explore_jitter),
                    here.z,
                );
            }
            Action::Idle | Action::MoveToTarget | Action::Eat | Action::Sleep | Action::Flee => {
                actions.target_entity[i] = None;
            }
        }
    }
}

/// Uniform integer offset in `[-amount, amount)`.
fn jitter(rng: &mut fastrand::Rng, amount: i32) -> f32 {
    if amount == 0 {
        return 0.0;
    }
    rng.i32(-amount..amount) as f32
}
