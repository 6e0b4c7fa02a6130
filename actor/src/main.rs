//! pobo-arena - match runner for the Pobo search engine
//!
//! A command-line process that:
//! 1. Loads settings from config.toml, environment variables and flags
//! 2. Builds two players (oracle-guided MCTS or uniform random)
//! 3. Plays a series of Lineup games, swapping colors after each one
//! 4. Logs a summary, optionally printing it as JSON

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod arena;
mod config;
mod player;
mod stats;

use crate::arena::Arena;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse().resolve();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    info!(
        games = config.games,
        player_one = %config.blue,
        player_two = %config.red,
        board_size = config.board_size,
        time_budget_ms = config.time_budget_ms,
        seed = ?config.seed,
        "Starting arena"
    );

    let mut arena = Arena::new(&config)?;

    match arena.run(config.games) {
        Ok(stats) => {
            stats.log_summary();
            if config.json {
                println!("{}", serde_json::to_string_pretty(&stats.snapshot())?);
            }
            Ok(())
        }
        Err(e) => {
            error!("Arena failed: {}", e);
            Err(e)
        }
    }
}
