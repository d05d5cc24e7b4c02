use serde::{Deserialize, Serialize};

use crate::ecs::components::EntityId;

/// How cell coordinates outside `[0, grid_size)` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Coordinates wrap modulo the grid size, so opposite world edges are
    /// neighbor cells.
    #[default]
    Toroidal,
    /// Inserts clamp to the edge cell and queries skip cells past the edge.
    Bounded,
}

/// Uniform grid for O(1) neighbor queries.
///
/// Rebuilt from scratch every tick; holds no state across ticks.
/// Cell width should be close to the typical perception radius.
pub struct SpatialGrid {
    cell_width: f32,
    grid_size: usize,
    topology: Topology,
    /// Row-major `y * grid_size + x`. Pre-allocated, cleared each tick.
    cells: Vec<Vec<EntityId>>,
}

impl SpatialGrid {
    pub fn new(cell_width: f32, grid_size: usize, topology: Topology) -> Self {
        let mut cells = Vec::with_capacity(grid_size * grid_size);
        for _ in 0..grid_size * grid_size {
            cells.push(Vec::with_capacity(4));
        }
        Self {
            cell_width,
            grid_size,
            topology,
            cells,
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Empty every cell. Keeps allocations.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Append `id` to the cell containing `(x, y)`. Never rejects a position.
    pub fn insert(&mut self, id: EntityId, x: f32, y: f32) {
        let (cx, cy) = self.cell_coords(x, y);
        let idx = match self.topology {
            Topology::Toroidal => self.wrap(cx, cy),
            Topology::Bounded => {
                let max = self.grid_size as i32 - 1;
                self.flat(cx.clamp(0, max), cy.clamp(0, max))
            }
        };
        self.cells[idx].push(id);
    }

    /// Unresolved cell coordinates of a world position.
    pub fn cell_coords(&self, x: f32, y: f32) -> (i32, i32) {
        let cx = (x / self.cell_width).floor() as i32;
        let cy = (y / self.cell_width).floor() as i32;
        (cx, cy)
    }

    /// Entities in one cell, or an empty slice if the cell does not resolve.
    pub fn cell(&self, cx: i32, cy: i32) -> &[EntityId] {
        match self.resolve(cx, cy) {
            Some(idx) => &self.cells[idx][..],
            None => &[],
        }
    }

    /// Visit every entity in the 3x3 block centered on cell `(cx, cy)`.
    ///
    /// Traversal is x-major: column `cx - 1` top to bottom, then `cx`, then
    /// `cx + 1`. Callers that pick "the first" candidate depend on this order.
    pub fn query_neighbors(&self, cx: i32, cy: i32, mut callback: impl FnMut(EntityId)) {
        for dx in -1i32..=1 {
            for dy in -1i32..=1 {
                let Some(idx) = self.resolve(cx.wrapping_add(dx), cy.wrapping_add(dy)) else {
                    continue;
                };
                for &id in &self.cells[idx] {
                    callback(id);
                }
            }
        }
    }

    /// Total number of entries across all cells.
    pub fn occupancy(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    fn resolve(&self, cx: i32, cy: i32) -> Option<usize> {
        match self.topology {
            Topology::Toroidal => Some(self.wrap(cx, cy)),
            Topology::Bounded => {
                let n = self.grid_size as i32;
                if (0..n).contains(&cx) && (0..n).contains(&cy) {
                    Some(self.flat(cx, cy))
                } else {
                    None
                }
            }
        }
    }

    fn wrap(&self, cx: i32, cy: i32) -> usize {
        let n = self.grid_size as i32;
        self.flat(cx.rem_euclid(n), cy.rem_euclid(n))
    }

    #[inline]
    fn flat(&self, x: i32, y: i32) -> usize {
        y as usize * self.grid_size + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(grid: &SpatialGrid, x: f32, y: f32) -> Vec<EntityId> {
        let (cx, cy) = grid.cell_coords(x, y);
        let mut found = Vec::new();
        grid.query_neighbors(cx, cy, |id| found.push(id));
        found
    }

    #[test]
    fn insert_and_query() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Toroidal);
        grid.insert(EntityId(0), 100.0, 100.0);
        grid.insert(EntityId(1), 110.0, 105.0);
        grid.insert(EntityId(2), 900.0, 900.0);

        let found = neighbors(&grid, 105.0, 102.0);
        assert!(found.contains(&EntityId(0)));
        assert!(found.contains(&EntityId(1)));
        assert!(!found.contains(&EntityId(2)));
    }

    #[test]
    fn clear_and_reuse() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Toroidal);
        grid.insert(EntityId(42), 50.0, 50.0);
        grid.clear();

        assert!(neighbors(&grid, 50.0, 50.0).is_empty());
        assert_eq!(grid.occupancy(), 0);
    }

    #[test]
    fn toroidal_wraps_out_of_range_positions() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Toroidal);
        // x = 1000 is cell 100, which wraps to column 0.
        grid.insert(EntityId(0), 1000.0, 5.0);
        grid.insert(EntityId(1), -5.0, 5.0);

        assert_eq!(grid.cell(0, 0), &[EntityId(0)]);
        assert_eq!(grid.cell(99, 0), &[EntityId(1)]);
        // Opposite edges are neighbors.
        let found = neighbors(&grid, 5.0, 5.0);
        assert!(found.contains(&EntityId(0)));
        assert!(found.contains(&EntityId(1)));
    }

    #[test]
    fn bounded_clamps_and_skips_edges() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Bounded);
        grid.insert(EntityId(0), 1000.0, 5.0);
        grid.insert(EntityId(1), 995.0, 5.0);

        assert_eq!(grid.cell(99, 0), &[EntityId(0), EntityId(1)]);
        assert!(neighbors(&grid, 5.0, 5.0).is_empty());
        assert_eq!(neighbors(&grid, 999.0, 5.0).len(), 2);
    }

    #[test]
    fn traversal_is_x_major() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Toroidal);
        // Column cx+1 inserted first, column cx-1 last.
        grid.insert(EntityId(0), 65.0, 55.0);
        grid.insert(EntityId(1), 55.0, 55.0);
        grid.insert(EntityId(2), 45.0, 65.0);

        let found = neighbors(&grid, 55.0, 55.0);
        assert_eq!(found, vec![EntityId(2), EntityId(1), EntityId(0)]);
    }

    #[test]
    fn non_finite_positions_do_not_panic() {
        let mut grid = SpatialGrid::new(10.0, 100, Topology::Toroidal);
        grid.insert(EntityId(0), f32::INFINITY, f32::NAN);
        let (cx, cy) = grid.cell_coords(f32::INFINITY, f32::NEG_INFINITY);
        grid.query_neighbors(cx, cy, |_| {});
        assert_eq!(grid.occupancy(), 1);
    }
}
