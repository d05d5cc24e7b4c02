use crate::ecs::store::EntityStore;
use crate::spatial::SpatialGrid;

/// Rebuild the spatial grid from the positions of living entities.
pub fn rebuild(store: &EntityStore, grid: &mut SpatialGrid) {
    grid.clear();
    for id in store.ids() {
        if !store.is_alive(id) {
            continue;
        }
        let pos = store.transforms.position[id.index()];
        grid.insert(id, pos.x, pos.y);
    }
}
