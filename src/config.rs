use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::store::MAX_ENTITIES;
use crate::spatial::Topology;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level run configuration. Every section falls back to its defaults,
/// so a config file only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
    pub grid: GridConfig,
    pub spawn: SpawnConfig,
    pub kinetic: KineticConfig,
    pub needs: NeedsConfig,
    pub decision: DecisionConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub entity_count: usize,
    pub ticks: u64,
    /// Seconds per tick.
    pub dt: f32,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            entity_count: 1000,
            ticks: 100,
            dt: 0.016,
            seed: 42,
        }
    }
}

/// World extents. Positions are clamped into `[0, width] x [0, height]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_width: f32,
    /// Cells per axis.
    pub grid_size: usize,
    pub topology: Topology,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            grid_size: 100,
            topology: Topology::Toroidal,
        }
    }
}

/// Initial population parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub view_range_base: f32,
    /// Entity `i` sees `view_range_base + i % view_range_spread` units.
    pub view_range_spread: u32,
    pub view_angle: f32,
    pub max_health: f32,
    pub armor_classes: u8,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            view_range_base: 50.0,
            view_range_spread: 50,
            view_angle: std::f32::consts::FRAC_PI_2,
            max_health: 100.0,
            armor_classes: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    /// Acceleration multiplier while fleeing.
    pub flee_multiplier: f32,
    /// Below this distance no steering force is applied.
    pub arrival_threshold: f32,
    /// Velocity multiplier per tick while sleeping or idle.
    pub rest_decay: f32,
}

impl Default for KineticConfig {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            acceleration: 2.0,
            flee_multiplier: 1.5,
            arrival_threshold: 0.1,
            rest_decay: 0.9,
        }
    }
}

/// Rates are per second of simulated time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub hunger_rate: f32,
    pub eat_rate: f32,
    pub energy_drain: f32,
    pub sleep_recovery: f32,
    /// Seeing more than this many entities erodes safety.
    pub crowding_threshold: u32,
    pub safety_loss: f32,
    pub safety_recovery: f32,
    /// Curiosity moves by `k * curiosity_step * dt`, `k` uniform in [-50, 50).
    pub curiosity_step: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger_rate: 0.01,
            eat_rate: 0.15,
            energy_drain: 0.02,
            sleep_recovery: 0.1,
            crowding_threshold: 3,
            safety_loss: 0.05,
            safety_recovery: 0.03,
            curiosity_step: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Explore targets land within `[-jitter, jitter)` units per axis.
    pub explore_jitter: i32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self { explore_jitter: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub replay: bool,
    pub replay_path: String,
    pub profiling: bool,
    pub chaos: bool,
    pub chaos_probability: f32,
    /// Defaults to a value derived from the simulation seed.
    pub chaos_seed: Option<u64>,
    pub validate: bool,
    /// Ticks between census/profiler reports.
    pub stats_interval: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            replay: true,
            replay_path: "simulation_log.bin".to_owned(),
            profiling: true,
            chaos: false,
            chaos_probability: 0.001,
            chaos_seed: None,
            validate: true,
            stats_interval: 10,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn chaos_seed(&self) -> u64 {
        self.diagnostics
            .chaos_seed
            .unwrap_or(self.simulation.seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.dt.is_finite() && sim.dt > 0.0) {
            return invalid("simulation.dt must be a positive finite number");
        }
        if !(self.world.width.is_finite() && self.world.width > 0.0)
            || !(self.world.height.is_finite() && self.world.height > 0.0)
        {
            return invalid("world extents must be positive and finite");
        }
        if !(self.grid.cell_width.is_finite() && self.grid.cell_width > 0.0) {
            return invalid("grid.cell_width must be positive and finite");
        }
        // A wrapped 3x3 block on a smaller grid visits some cells twice.
        if self.grid.grid_size < 3 {
            return invalid("grid.grid_size must be at least 3");
        }
        if sim.entity_count > MAX_ENTITIES {
            return invalid("simulation.entity_count exceeds the id space");
        }

        let spawn = &self.spawn;
        if !spawn.view_range_base.is_finite() || spawn.view_range_base < 0.0 {
            return invalid("spawn.view_range_base must be non-negative");
        }
        if spawn.view_range_spread == 0 {
            return invalid("spawn.view_range_spread must be at least 1");
        }
        if !spawn.view_angle.is_finite() || spawn.view_angle < 0.0 {
            return invalid("spawn.view_angle must be non-negative");
        }
        if spawn.armor_classes == 0 {
            return invalid("spawn.armor_classes must be at least 1");
        }

        let k = &self.kinetic;
        if !(k.max_speed.is_finite() && k.max_speed > 0.0) {
            return invalid("kinetic.max_speed must be positive");
        }
        if !k.acceleration.is_finite() || !k.flee_multiplier.is_finite() {
            return invalid("kinetic acceleration values must be finite");
        }
        if !(0.0..1.0).contains(&k.rest_decay) {
            return invalid("kinetic.rest_decay must be within [0, 1)");
        }
        if !k.arrival_threshold.is_finite() || k.arrival_threshold < 0.0 {
            return invalid("kinetic.arrival_threshold must be non-negative");
        }

        let n = &self.needs;
        let rates = [
            n.hunger_rate,
            n.eat_rate,
            n.energy_drain,
            n.sleep_recovery,
            n.safety_loss,
            n.safety_recovery,
            n.curiosity_step,
        ];
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return invalid("needs rates must be non-negative and finite");
        }

        if self.decision.explore_jitter < 0 {
            return invalid("decision.explore_jitter must be non-negative");
        }

        let d = &self.diagnostics;
        if !(0.0..=1.0).contains(&d.chaos_probability) {
            return invalid("diagnostics.chaos_probability must be within [0, 1]");
        }
        if d.stats_interval == 0 {
            return invalid("diagnostics.stats_interval must be at least 1");
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            [simulation]
            entity_count = 12
            seed = 7

            [grid]
            topology = "bounded"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.simulation.entity_count, 12);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.ticks, 100);
        assert_eq!(config.grid.topology, Topology::Bounded);
        assert_eq!(config.grid.grid_size, 100);
        assert_eq!(config.kinetic, KineticConfig::default());
    }

    #[test]
    fn rejects_tiny_grid() {
        let mut config = SimConfig::default();
        config.grid.grid_size = 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_bad_dt_and_probability() {
        let mut config = SimConfig::default();
        config.simulation.dt = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.diagnostics.chaos_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn reports_parse_errors() {
        let err = SimConfig::from_toml_str("[simulation]\nentity_count = \"lots\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn chaos_seed_defaults_from_simulation_seed() {
        let mut config = SimConfig::default();
        assert_ne!(config.chaos_seed(), config.simulation.seed);
        config.diagnostics.chaos_seed = Some(5);
        assert_eq!(config.chaos_seed(), 5);
    }
}
