use glam::Vec2;

use crate::config::{KineticConfig, WorldConfig};
use crate::ecs::components::Action;
use crate::ecs::store::EntityStore;

/// Steer from the current action, then clamp speed, integrate position and
/// clamp it into the world rectangle. Movement is planar; z is left alone.
pub fn integrate(store: &mut EntityStore, dt: f32, config: &KineticConfig, world: &WorldConfig) {
    let EntityStore {
        transforms,
        actions,
        health,
        stimulus,
        ..
    } = store;

    for i in 0..health.alive.len() {
        if !health.alive[i] {
            continue;
        }
        let pos = transforms.position[i].truncate();
        let mut vel = transforms.velocity[i].truncate();

        match actions.current[i] {
            Action::MoveToTarget | Action::Attack | Action::Explore => {
                let to_target = actions.target_position[i].truncate() - pos;
                let distance = to_target.length();
                if distance > config.arrival_threshold {
                    vel += to_target / distance * config.acceleration * dt;
                    transforms.orientation[i] = to_target.y.atan2(to_target.x);
                }
            }
            Action::Flee => {
                // The first visible entity is the threat.
                if let Some(&threat) = stimulus.visible[i].first() {
                    let away = pos - transforms.position[threat.index()].truncate();
                    let distance = away.length();
                    if distance > config.arrival_threshold {
                        vel += away / distance * config.acceleration * config.flee_multiplier * dt;
                    }
                }
            }
            Action::Sleep | Action::Idle => {
                vel *= config.rest_decay;
            }
            Action::Eat => {}
        }

        vel = clamp_speed(vel, config.max_speed);
        let pos = pos + vel * dt;
        let pos = Vec2::new(pos.x.clamp(0.0, world.width), pos.y.clamp(0.0, world.height));

        let v = &mut transforms.velocity[i];
        v.x = vel.x;
        v.y = vel.y;
        let p = &mut transforms.position[i];
        p.x = pos.x;
        p.y = pos.y;
    }
}

/// Rescale `vel` onto the speed cap if it exceeds it.
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed_sq = vel.length_squared();
    if speed_sq > max_speed * max_speed {
        vel / speed_sq.sqrt() * max_speed
    } else {
        vel
    }
}
