//! Default configuration values loaded from config.defaults.toml.
//!
//! The TOML file is embedded at compile time so every binary agrees on the
//! same defaults without having to find the file at runtime.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    first_n_strategy: u32,
    playout_depth: u32,
    action_masking_time: u32,
    discount_score: f64,
    exploration_constant: f64,
    terminal_score: f64,
    time_budget_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    games: u32,
    blue: String,
    red: String,
    board_size: u8,
    pool_size: u8,
    max_plies: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn first_n_strategy() -> u32 {
    DEFAULTS.mcts.first_n_strategy
}
pub fn playout_depth() -> u32 {
    DEFAULTS.mcts.playout_depth
}
pub fn action_masking_time() -> u32 {
    DEFAULTS.mcts.action_masking_time
}
pub fn discount_score() -> f64 {
    DEFAULTS.mcts.discount_score
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn terminal_score() -> f64 {
    DEFAULTS.mcts.terminal_score
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.mcts.time_budget_ms
}

// Arena
pub fn games() -> u32 {
    DEFAULTS.arena.games
}
pub fn blue_player() -> &'static str {
    &DEFAULTS.arena.blue
}
pub fn red_player() -> &'static str {
    &DEFAULTS.arena.red
}
pub fn board_size() -> u8 {
    DEFAULTS.arena.board_size
}
pub fn pool_size() -> u8 {
    DEFAULTS.arena.pool_size
}
pub fn max_plies() -> u32 {
    DEFAULTS.arena.max_plies
}
