use anyhow::{Context, Result};
use tracing::info;

use grid_world::{GridConfig, GridWorld};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = GridConfig::new(4, 4).with_obstacles(4);

    // Optional first argument: seed for a reproducible layout.
    let env = match std::env::args().nth(1) {
        Some(arg) => {
            let seed: u64 = arg
                .parse()
                .with_context(|| format!("seed must be an unsigned integer, got {:?}", arg))?;
            info!(seed, "building seeded grid");
            GridWorld::with_seed(&config, seed)?
        }
        None => GridWorld::new(&config, &mut rand::thread_rng())?,
    };

    env.print_grid();
    env.print_grid_rewards();
    Ok(())
}
