use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use swarmsim::app;
use swarmsim::config::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "swarmsim")]
#[command(about = "Agent swarm simulation: perception, utility AI, kinetics, needs")]
struct Cli {
    /// TOML config file; missing keys fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    ticks: Option<u64>,
    #[arg(long)]
    entities: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Seconds per tick.
    #[arg(long)]
    dt: Option<f32>,
    /// Enable random state corruption.
    #[arg(long, default_value_t = false)]
    chaos: bool,
    #[arg(long)]
    chaos_probability: Option<f32>,
    #[arg(long, default_value_t = false)]
    no_replay: bool,
    #[arg(long)]
    replay_path: Option<String>,
    #[arg(long, default_value_t = false)]
    no_profile: bool,
    #[arg(long, default_value_t = false)]
    no_validate: bool,
}

impl Cli {
    fn into_config(self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        let sim = &mut config.simulation;
        if let Some(ticks) = self.ticks {
            sim.ticks = ticks;
        }
        if let Some(entities) = self.entities {
            sim.entity_count = entities;
        }
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(dt) = self.dt {
            sim.dt = dt;
        }

        let diag = &mut config.diagnostics;
        diag.chaos |= self.chaos;
        if let Some(p) = self.chaos_probability {
            diag.chaos_probability = p;
        }
        if self.no_replay {
            diag.replay = false;
        }
        if let Some(path) = self.replay_path {
            diag.replay_path = path;
        }
        if self.no_profile {
            diag.profiling = false;
        }
        if self.no_validate {
            diag.validate = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("swarmsim starting up");

    let result = Cli::parse().into_config().and_then(app::run);
    if let Err(e) = result {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}
