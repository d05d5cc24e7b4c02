use crate::config::{ConfigError, SimConfig};
use crate::debug::timer::SystemTimers;
use crate::ecs::store::EntityStore;
use crate::ecs::systems;
use crate::spatial::SpatialGrid;
use crate::spawn;

/// Everything one simulation run owns. The output of a run is a pure
/// function of the config (including its seed), the initial store and the
/// number of steps.
pub struct Simulation {
    config: SimConfig,
    store: EntityStore,
    grid: SpatialGrid,
    rng: fastrand::Rng,
    timers: SystemTimers,
    tick_count: u64,
}

impl Simulation {
    /// Validate `config` and spawn its seeded population.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(config.simulation.seed);
        let mut store = EntityStore::new();
        spawn::populate(&mut store, config.simulation.entity_count, &config, &mut rng);
        Ok(Self::assemble(config, store, rng))
    }

    /// Run a hand-built population under `config`.
    pub fn from_store(config: SimConfig, store: EntityStore) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = fastrand::Rng::with_seed(config.simulation.seed);
        Ok(Self::assemble(config, store, rng))
    }

    fn assemble(config: SimConfig, store: EntityStore, rng: fastrand::Rng) -> Self {
        let grid = SpatialGrid::new(
            config.grid.cell_width,
            config.grid.grid_size,
            config.grid.topology,
        );
        Self {
            config,
            store,
            grid,
            rng,
            timers: SystemTimers::new(),
            tick_count: 0,
        }
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        systems::tick(
            &mut self.store,
            &mut self.grid,
            &self.config,
            &mut self.rng,
            &mut self.timers,
        );
        self.tick_count += 1;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// For collaborators that perturb state between ticks.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
