use glam::Vec3;

use crate::config::WorldConfig;
use crate::ecs::components::EntityId;
use crate::ecs::store::EntityStore;

/// A corruption the injector applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Killed,
    Teleported,
    NeedsCorrupted,
}

impl FaultKind {
    /// Event name written to the replay log.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Killed => "killed",
            Self::Teleported => "teleported",
            Self::NeedsCorrupted => "needs_corrupted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultEvent {
    pub entity: EntityId,
    pub kind: FaultKind,
}

/// Randomly corrupts entity state to exercise validation and resilience.
///
/// Owns its own RNG so switching it on never shifts the simulation's
/// random stream.
pub struct FaultInjector {
    rng: fastrand::Rng,
    probability: f32,
    enabled: bool,
}

impl FaultInjector {
    pub fn new(probability: f32, seed: u64, enabled: bool) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            probability,
            enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Three independent trials per living entity: kill, teleport, scramble
    /// hunger and energy. Returns what was applied, in entity order.
    pub fn maybe_corrupt(&mut self, store: &mut EntityStore, world: &WorldConfig) -> Vec<FaultEvent> {
        let mut events = Vec::new();
        if !self.enabled {
            return events;
        }

        for id in store.ids() {
            if !store.is_alive(id) {
                continue;
            }
            if self.roll() {
                store.kill(id);
                log::warn!("[CHAOS] Killed entity {id}");
                events.push(FaultEvent {
                    entity: id,
                    kind: FaultKind::Killed,
                });
            }
            if self.roll() {
                let z = store.transforms().position[id.index()].z;
                let pos = Vec3::new(self.rng.f32() * world.width, self.rng.f32() * world.height, z);
                store.set_position(id, pos);
                log::warn!("[CHAOS] Teleported entity {id} to ({:.1}, {:.1})", pos.x, pos.y);
                events.push(FaultEvent {
                    entity: id,
                    kind: FaultKind::Teleported,
                });
            }
            if self.roll() {
                let mut levels = store.needs().levels(id.index());
                levels.hunger = self.rng.f32();
                levels.energy = self.rng.f32();
                store.set_needs(id, levels);
                log::warn!("[CHAOS] Corrupted needs for entity {id}");
                events.push(FaultEvent {
                    entity: id,
                    kind: FaultKind::NeedsCorrupted,
                });
            }
        }
        events
    }

    fn roll(&mut self) -> bool {
        self.rng.f32() < self.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_a_no_op() {
        let mut store = EntityStore::with_entities(10);
        let mut chaos = FaultInjector::new(1.0, 1, false);
        assert!(chaos.maybe_corrupt(&mut store, &WorldConfig::default()).is_empty());
        assert_eq!(store.alive_count(), 10);
    }

    #[test]
    fn certain_corruption_hits_every_living_entity() {
        let mut store = EntityStore::with_entities(4);
        store.kill(EntityId(2));
        let mut chaos = FaultInjector::new(1.0, 1, true);
        let events = chaos.maybe_corrupt(&mut store, &WorldConfig::default());

        assert_eq!(events.len(), 9);
        assert!(events.iter().all(|e| e.entity != EntityId(2)));
        assert_eq!(store.alive_count(), 0);
        for i in [0, 1, 3] {
            let p = store.transforms().position[i];
            assert!((0.0..1000.0).contains(&p.x) && (0.0..1000.0).contains(&p.y));
            let n = store.needs().levels(i);
            assert!((0.0..1.0).contains(&n.hunger) && (0.0..1.0).contains(&n.energy));
        }
    }

    #[test]
    fn zero_probability_never_fires() {
        let mut store = EntityStore::with_entities(100);
        let mut chaos = FaultInjector::new(0.0, 3, true);
        for _ in 0..10 {
            assert!(chaos.maybe_corrupt(&mut store, &WorldConfig::default()).is_empty());
        }
    }

    #[test]
    fn seeded_runs_match() {
        let run = || {
            let mut store = EntityStore::with_entities(200);
            let mut chaos = FaultInjector::new(0.05, 99, true);
            chaos.maybe_corrupt(&mut store, &WorldConfig::default())
        };
        assert_eq!(run(), run());
    }
}
