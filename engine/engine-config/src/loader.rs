//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "POBO_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Container image
];

/// Load the central configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the POBO_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults with a
/// warning; env overrides are applied either way.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: POBO_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "POBO_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "POBO_COMMON_SEED", optional_parse);

    // MCTS
    env_override!(
        config,
        mcts.first_n_strategy,
        "POBO_MCTS_FIRST_N_STRATEGY",
        parse
    );
    env_override!(config, mcts.playout_depth, "POBO_MCTS_PLAYOUT_DEPTH", parse);
    env_override!(
        config,
        mcts.action_masking_time,
        "POBO_MCTS_ACTION_MASKING_TIME",
        parse
    );
    env_override!(
        config,
        mcts.discount_score,
        "POBO_MCTS_DISCOUNT_SCORE",
        parse
    );
    env_override!(
        config,
        mcts.exploration_constant,
        "POBO_MCTS_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.terminal_score,
        "POBO_MCTS_TERMINAL_SCORE",
        parse
    );
    env_override!(
        config,
        mcts.time_budget_ms,
        "POBO_MCTS_TIME_BUDGET_MS",
        parse
    );

    // Arena
    env_override!(config, arena.games, "POBO_ARENA_GAMES", parse);
    env_override!(config, arena.blue, "POBO_ARENA_BLUE");
    env_override!(config, arena.red, "POBO_ARENA_RED");
    env_override!(config, arena.board_size, "POBO_ARENA_BOARD_SIZE", parse);
    env_override!(config, arena.pool_size, "POBO_ARENA_POOL_SIZE", parse);
    env_override!(config, arena.max_plies, "POBO_ARENA_MAX_PLIES", parse);

    config
}
