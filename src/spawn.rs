use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::SimConfig;
use crate::ecs::components::{EntityId, NeedLevels};
use crate::ecs::store::EntityStore;

/// Size `store` to `count` entities and give each one randomized state
/// drawn from `rng`. Same seed, same population.
pub fn populate(store: &mut EntityStore, count: usize, config: &SimConfig, rng: &mut fastrand::Rng) {
    store.initialize(count);

    let world = &config.world;
    let spawn = &config.spawn;
    for i in 0..count {
        let id = EntityId(i as u32);

        let x = rng.f32() * world.width;
        let y = rng.f32() * world.height;
        store.set_position(id, Vec3::new(x, y, 0.0));
        store.set_velocity(id, Vec3::ZERO);
        store.set_orientation(id, rng.f32() * TAU);

        let range = spawn.view_range_base + (i as u32 % spawn.view_range_spread) as f32;
        store.set_view(id, range, spawn.view_angle);

        store.set_needs(
            id,
            NeedLevels {
                hunger: rng.f32(),
                energy: rng.f32(),
                safety: rng.f32(),
                curiosity: rng.f32(),
            },
        );

        store.set_health(
            id,
            spawn.max_health,
            spawn.max_health,
            (i % spawn.armor_classes as usize) as u8,
        );
    }

    log::info!("Initialized {count} entities");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Action;

    #[test]
    fn population_matches_config() {
        let config = SimConfig::default();
        let mut store = EntityStore::new();
        let mut rng = fastrand::Rng::with_seed(42);
        populate(&mut store, 120, &config, &mut rng);

        assert_eq!(store.len(), 120);
        assert_eq!(store.alive_count(), 120);
        let t = store.transforms();
        let p = store.perception();
        let h = store.health();
        for i in 0..store.len() {
            let pos = t.position[i];
            assert!((0.0..1000.0).contains(&pos.x) && (0.0..1000.0).contains(&pos.y));
            assert_eq!(pos.z, 0.0);
            assert!((0.0..TAU).contains(&t.orientation[i]));
            assert_eq!(p.view_range[i], 50.0 + (i % 50) as f32);
            assert_eq!(h.armor_class[i], (i % 3) as u8);
            assert_eq!(h.current[i], 100.0);
            assert_eq!(store.actions().current[i], Action::Idle);
            let n = store.needs().levels(i);
            for v in [n.hunger, n.energy, n.safety, n.curiosity] {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn same_seed_same_population() {
        let config = SimConfig::default();
        let build = |seed| {
            let mut store = EntityStore::new();
            populate(&mut store, 10, &config, &mut fastrand::Rng::with_seed(seed));
            store.transforms().position.clone()
        };
        assert_eq!(build(5), build(5));
        assert_ne!(build(5), build(6));
    }
}
