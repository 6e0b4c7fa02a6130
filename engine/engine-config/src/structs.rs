//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_first_n_strategy() -> u32 {
    defaults::first_n_strategy()
}
fn d_playout_depth() -> u32 {
    defaults::playout_depth()
}
fn d_action_masking_time() -> u32 {
    defaults::action_masking_time()
}
fn d_discount_score() -> f64 {
    defaults::discount_score()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_terminal_score() -> f64 {
    defaults::terminal_score()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_blue() -> String {
    defaults::blue_player().into()
}
fn d_red() -> String {
    defaults::red_player().into()
}
fn d_board_size() -> u8 {
    defaults::board_size()
}
fn d_pool_size() -> u8 {
    defaults::pool_size()
}
fn d_max_plies() -> u32 {
    defaults::max_plies()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Fixed seed for every random source. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: None,
        }
    }
}

/// Search tunables
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    /// Playout plies that ask the solver before switching to random moves
    #[serde(default = "d_first_n_strategy")]
    pub first_n_strategy: u32,
    /// Ply cap for a single playout
    #[serde(default = "d_playout_depth")]
    pub playout_depth: u32,
    /// Real-game plies during which border placements are masked
    #[serde(default = "d_action_masking_time")]
    pub action_masking_time: u32,
    #[serde(default = "d_discount_score")]
    pub discount_score: f64,
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
    /// Magnitude of the win/loss bonus
    #[serde(default = "d_terminal_score")]
    pub terminal_score: f64,
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            first_n_strategy: defaults::first_n_strategy(),
            playout_depth: defaults::playout_depth(),
            action_masking_time: defaults::action_masking_time(),
            discount_score: defaults::discount_score(),
            exploration_constant: defaults::exploration_constant(),
            terminal_score: defaults::terminal_score(),
            time_budget_ms: defaults::time_budget_ms(),
        }
    }
}

/// Match runner configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    /// Player kind in the first seat: "mcts" or "random"
    #[serde(default = "d_blue")]
    pub blue: String,
    #[serde(default = "d_red")]
    pub red: String,
    #[serde(default = "d_board_size")]
    pub board_size: u8,
    #[serde(default = "d_pool_size")]
    pub pool_size: u8,
    /// Plies after which a match is scored as a draw
    #[serde(default = "d_max_plies")]
    pub max_plies: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            blue: defaults::blue_player().into(),
            red: defaults::red_player().into(),
            board_size: defaults::board_size(),
            pool_size: defaults::pool_size(),
            max_plies: defaults::max_plies(),
        }
    }
}
