use glam::Vec3;

use super::components::{
    Actions, EntityId, Health, NeedLevels, Needs, Perception, StimulusBuffer, Transforms,
};

/// Most rows a store can hold; every row needs a distinct `u32` id.
pub const MAX_ENTITIES: usize = u32::MAX as usize;

/// Structure-of-arrays entity storage.
///
/// Every column group has exactly `len()` rows at all times. Rows are only
/// ever appended; an entity that "dies" keeps its slot with `alive = false`
/// and every stage skips it.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    len: usize,
    pub(crate) transforms: Transforms,
    pub(crate) perception: Perception,
    pub(crate) needs: Needs,
    pub(crate) actions: Actions,
    pub(crate) health: Health,
    pub(crate) stimulus: StimulusBuffer,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store sized to `count` default rows.
    pub fn with_entities(count: usize) -> Self {
        let mut store = Self::new();
        store.initialize(count);
        store
    }

    /// Size every column to `count`. New rows are alive, Idle and untargeted;
    /// positions and needs are zero until the caller fills them in.
    ///
    /// # Panics
    ///
    /// If `count` exceeds [`MAX_ENTITIES`].
    pub fn initialize(&mut self, count: usize) {
        assert!(
            count <= MAX_ENTITIES,
            "entity count {count} exceeds the id space ({MAX_ENTITIES})"
        );
        self.len = count;
        self.resize_columns();
    }

    /// Append one default row and return its id.
    ///
    /// # Panics
    ///
    /// If the store already holds [`MAX_ENTITIES`] rows.
    pub fn add_entity(&mut self) -> EntityId {
        assert!(self.len < MAX_ENTITIES, "entity id space exhausted");
        let id = EntityId(self.len as u32);
        self.len += 1;
        self.resize_columns();
        id
    }

    fn resize_columns(&mut self) {
        let len = self.len;
        self.transforms.resize(len);
        self.perception.resize(len);
        self.needs.resize(len);
        self.actions.resize(len);
        self.health.resize(len);
        self.stimulus.resize(len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.len as u32).map(EntityId)
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.health.alive[id.index()]
    }

    pub fn alive_count(&self) -> usize {
        self.health.alive.iter().filter(|&&a| a).count()
    }

    /// Row counts of every column group, by name.
    pub fn column_lengths(&self) -> [(&'static str, usize); 6] {
        [
            ("transforms", self.transforms.len()),
            ("perception", self.perception.len()),
            ("needs", self.needs.len()),
            ("actions", self.actions.len()),
            ("health", self.health.len()),
            ("stimulus", self.stimulus.len()),
        ]
    }

    // -- read access -------------------------------------------------------

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn needs(&self) -> &Needs {
        &self.needs
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Entities `id` saw during the last perception pass.
    pub fn stimuli(&self, id: EntityId) -> &[EntityId] {
        &self.stimulus.visible[id.index()]
    }

    // -- per-entity setters --------------------------------------------------

    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        self.transforms.position[id.index()] = position;
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec3) {
        self.transforms.velocity[id.index()] = velocity;
    }

    pub fn set_orientation(&mut self, id: EntityId, radians: f32) {
        self.transforms.orientation[id.index()] = radians;
    }

    /// `angle` is the full field-of-view width in radians.
    pub fn set_view(&mut self, id: EntityId, range: f32, angle: f32) {
        self.perception.view_range[id.index()] = range;
        self.perception.view_angle[id.index()] = angle;
    }

    pub fn set_needs(&mut self, id: EntityId, levels: NeedLevels) {
        let i = id.index();
        self.needs.hunger[i] = levels.hunger;
        self.needs.energy[i] = levels.energy;
        self.needs.safety[i] = levels.safety;
        self.needs.curiosity[i] = levels.curiosity;
    }

    pub fn set_health(&mut self, id: EntityId, current: f32, max: f32, armor_class: u8) {
        let i = id.index();
        self.health.current[i] = current;
        self.health.max[i] = max;
        self.health.armor_class[i] = armor_class;
    }

    /// Flag an entity dead. Its row stays in place.
    pub fn kill(&mut self, id: EntityId) {
        self.health.alive[id.index()] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Action;

    fn assert_aligned(store: &EntityStore) {
        for (name, len) in store.column_lengths() {
            assert_eq!(len, store.len(), "{name} out of sync");
        }
    }

    #[test]
    fn initialize_sizes_every_column() {
        let store = EntityStore::with_entities(16);
        assert_eq!(store.len(), 16);
        assert_aligned(&store);

        for id in store.ids() {
            assert!(store.is_alive(id));
            assert_eq!(store.actions().current[id.index()], Action::Idle);
            assert_eq!(store.actions().target_entity[id.index()], None);
            assert!(store.stimuli(id).is_empty());
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "exceeds the id space")]
    fn initialize_rejects_counts_past_the_id_space() {
        EntityStore::new().initialize(MAX_ENTITIES + 1);
    }

    #[test]
    #[should_panic(expected = "id space exhausted")]
    fn add_entity_stops_at_the_id_space() {
        let mut store = EntityStore::new();
        // Only the length matters; the assert fires before any resize.
        store.len = MAX_ENTITIES;
        store.add_entity();
    }

    #[test]
    fn add_entity_appends_default_row() {
        let mut store = EntityStore::with_entities(3);
        store.set_position(EntityId(1), Vec3::new(4.0, 5.0, 0.0));

        let id = store.add_entity();
        assert_eq!(id, EntityId(3));
        assert_eq!(store.len(), 4);
        assert_aligned(&store);
        assert!(store.is_alive(id));
        assert_eq!(store.transforms().position[id.index()], Vec3::ZERO);
        // Existing rows untouched.
        assert_eq!(store.transforms().position[1], Vec3::new(4.0, 5.0, 0.0));
    }

    #[test]
    fn kill_keeps_slot() {
        let mut store = EntityStore::with_entities(2);
        store.kill(EntityId(0));
        assert!(!store.is_alive(EntityId(0)));
        assert_eq!(store.len(), 2);
        assert_eq!(store.alive_count(), 1);
        assert_aligned(&store);
    }

    #[test]
    fn empty_store_grows_from_zero() {
        let mut store = EntityStore::new();
        assert!(store.is_empty());
        assert_eq!(store.add_entity(), EntityId(0));
        assert_eq!(store.add_entity(), EntityId(1));
        assert_aligned(&store);
    }
}
