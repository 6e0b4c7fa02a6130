//! Configuration for the arena runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_games() -> u32 {
    std::env::var("ARENA_GAMES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.arena.games)
}

fn default_blue() -> String {
    std::env::var("ARENA_BLUE").unwrap_or_else(|_| CENTRAL_CONFIG.arena.blue.clone())
}

fn default_red() -> String {
    std::env::var("ARENA_RED").unwrap_or_else(|_| CENTRAL_CONFIG.arena.red.clone())
}

fn default_board_size() -> u8 {
    std::env::var("ARENA_BOARD_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.arena.board_size)
}

fn default_pool_size() -> u8 {
    std::env::var("ARENA_POOL_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.arena.pool_size)
}

fn default_max_plies() -> u32 {
    std::env::var("ARENA_MAX_PLIES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.arena.max_plies)
}

fn default_time_budget_ms() -> u64 {
    std::env::var("ARENA_TIME_BUDGET_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.mcts.time_budget_ms)
}

fn default_seed() -> Option<u64> {
    std::env::var("ARENA_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .or(CENTRAL_CONFIG.common.seed)
}

fn default_log_level() -> String {
    std::env::var("ARENA_LOG_LEVEL").unwrap_or_else(|_| CENTRAL_CONFIG.common.log_level.clone())
}

/// Kind of player sitting in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Mcts,
    Random,
}

impl FromStr for PlayerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcts" => Ok(PlayerKind::Mcts),
            "random" => Ok(PlayerKind::Random),
            other => Err(anyhow!(
                "unknown player '{}', expected one of mcts, random",
                other
            )),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKind::Mcts => write!(f, "mcts"),
            PlayerKind::Random => write!(f, "random"),
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "pobo-arena")]
#[command(about = "Pobo arena - pit search engines against each other")]
#[command(
    long_about = "Plays a series of Lineup matches between two players and reports the results.
The two players swap colors after every game.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Player holding Blue in the first game (mcts or random)
    #[arg(long, default_value_t = default_blue())]
    pub blue: String,

    /// Player holding Red in the first game (mcts or random)
    #[arg(long, default_value_t = default_red())]
    pub red: String,

    /// Side length of the board
    #[arg(long, default_value_t = default_board_size())]
    pub board_size: u8,

    /// Pieces each player starts with
    #[arg(long, default_value_t = default_pool_size())]
    pub pool_size: u8,

    /// Plies after which a game is scored as a draw
    #[arg(long, default_value_t = default_max_plies())]
    pub max_plies: u32,

    /// Search time per MCTS move in milliseconds
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Seed for every random source (entropy when unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Print the final stats as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Fill in values that clap cannot default through `Option`.
    pub fn resolve(mut self) -> Self {
        if self.seed.is_none() {
            self.seed = default_seed();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        self.blue_kind()?;
        self.red_kind()?;

        if self.board_size < 3 {
            return Err(anyhow!(
                "board_size must be at least 3, got {}",
                self.board_size
            ));
        }

        if self.pool_size == 0 {
            return Err(anyhow!("pool_size must be greater than 0"));
        }

        if self.max_plies == 0 {
            return Err(anyhow!("max_plies must be greater than 0"));
        }

        if self.time_budget_ms == 0 {
            return Err(anyhow!("time_budget_ms must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn blue_kind(&self) -> Result<PlayerKind> {
        self.blue.parse()
    }

    pub fn red_kind(&self) -> Result<PlayerKind> {
        self.red.parse()
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Search settings from the central config, with this run's budget.
    pub fn mcts_config(&self) -> mcts::MctsConfig {
        mcts::MctsConfig::from_central(&CENTRAL_CONFIG.mcts).with_time_budget(self.time_budget())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            games: 2,
            blue: "mcts".into(),
            red: "random".into(),
            board_size: 6,
            pool_size: 8,
            max_plies: 200,
            time_budget_ms: 10,
            seed: Some(7),
            log_level: "info".into(),
            json: false,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn validate_rejects_unknown_player() {
        let mut cfg = base_config();
        cfg.red = "alphazero".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown player 'alphazero'"));
    }

    #[test]
    fn validate_rejects_tiny_board() {
        let mut cfg = base_config();
        cfg.board_size = 2;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("board_size"));
    }

    #[test]
    fn validate_rejects_zero_budget() {
        let mut cfg = base_config();
        cfg.time_budget_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("time_budget_ms"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn player_kind_parses_case_insensitively() {
        assert_eq!("MCTS".parse::<PlayerKind>().unwrap(), PlayerKind::Mcts);
        assert_eq!(" random ".parse::<PlayerKind>().unwrap(), PlayerKind::Random);
        assert_eq!(PlayerKind::Mcts.to_string(), "mcts");
    }

    #[test]
    fn mcts_config_uses_run_budget() {
        let cfg = base_config();
        let search = cfg.mcts_config();
        assert_eq!(search.time_budget, Duration::from_millis(10));
        assert!(search.validate().is_ok());
    }

    #[test]
    fn cli_overrides_defaults() {
        let cfg = Config::try_parse_from([
            "pobo-arena",
            "--games",
            "4",
            "--blue",
            "random",
            "--seed",
            "3",
            "--json",
        ])
        .unwrap();
        assert_eq!(cfg.games, 4);
        assert_eq!(cfg.blue_kind().unwrap(), PlayerKind::Random);
        assert_eq!(cfg.seed, Some(3));
        assert!(cfg.json);
    }
}
