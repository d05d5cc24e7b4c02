use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::ecs::components::EntityId;
use crate::ecs::store::EntityStore;
use crate::spatial::SpatialGrid;

/// Fill every living observer's stimulus buffer from the 3x3 cell block
/// around it, keeping candidates inside its view range and field of view.
///
/// Expects `grid` to have been rebuilt from `store` this tick. Candidates are
/// appended in grid traversal order, not sorted by distance.
pub fn update(store: &mut EntityStore, grid: &SpatialGrid) {
    let EntityStore {
        transforms,
        perception,
        health,
        stimulus,
        ..
    } = store;

    stimulus.clear();

    for (i, visible) in stimulus.visible.iter_mut().enumerate() {
        if !health.alive[i] {
            continue;
        }
        let observer = EntityId(i as u32);
        let obs_pos = transforms.position[i].truncate();
        let orientation = transforms.orientation[i];
        let range_sq = perception.view_range[i] * perception.view_range[i];
        let half_fov = perception.view_angle[i] * 0.5;

        let (cx, cy) = grid.cell_coords(obs_pos.x, obs_pos.y);
        grid.query_neighbors(cx, cy, |target| {
            if target == observer || !health.alive[target.index()] {
                return;
            }
            let offset = transforms.position[target.index()].truncate() - obs_pos;
            if in_view(offset, orientation, range_sq, half_fov) {
                visible.push(target);
            }
        });

        perception.visible_count[i] = visible.len() as u32;
    }
}

/// Range and field-of-view test for a displacement from the observer.
pub fn in_view(offset: Vec2, orientation: f32, range_sq: f32, half_fov: f32) -> bool {
    // Written so NaN distances fail.
    if !(offset.length_squared() <= range_sq) {
        return false;
    }
    let bearing = offset.y.atan2(offset.x);
    match normalize_angle(bearing - orientation) {
        Some(diff) => diff.abs() <= half_fov,
        None => false,
    }
}

/// Bring an angle into [-PI, PI] by whole turns. `None` for non-finite input.
pub fn normalize_angle(mut angle: f32) -> Option<f32> {
    if !angle.is_finite() {
        return None;
    }
    // Repeated subtraction stalls once TAU drops below the spacing of f32.
    if angle.abs() > TAU {
        angle = (angle + PI).rem_euclid(TAU) - PI;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    Some(angle)
}
