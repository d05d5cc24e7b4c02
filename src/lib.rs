//! Single-threaded agent swarm simulation.
//!
//! Each tick runs a fixed pipeline over a structure-of-arrays entity store:
//! spatial grid rebuild, perception, utility-based decision, kinetic
//! integration and needs update. See [`ecs::systems::tick`].

pub mod app;
pub mod config;
pub mod debug;
pub mod diagnostics;
pub mod ecs;
pub mod sim;
pub mod spatial;
pub mod spawn;
pub mod stats;
pub mod utility;

pub use config::SimConfig;
pub use ecs::components::{Action, EntityId, NeedLevels};
pub use ecs::store::EntityStore;
pub use sim::Simulation;
