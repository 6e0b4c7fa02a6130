//! MCTS configuration parameters.

use std::time::Duration;
use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("discount_score must be in (0, 1], got {0}")]
    Discount(f64),

    #[error("exploration_constant must be finite and non-negative, got {0}")]
    Exploration(f64),

    #[error("terminal_score must be finite and positive, got {0}")]
    TerminalScore(f64),
}

/// Configuration for the oracle-guided tree search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Playout plies that consult the solver before switching to
    /// uniformly random moves.
    pub first_n_strategy: u32,

    /// Maximum plies simulated by a single playout.
    pub playout_depth: u32,

    /// Real-game plies during which border placements are masked out of
    /// selection. 0 disables the mask.
    pub action_masking_time: u32,

    /// Geometric discount applied per playout ply. Values below 1.0 favour
    /// lines that resolve quickly.
    pub discount_score: f64,

    /// Exploration constant C in the UCT formula.
    pub exploration_constant: f64,

    /// Magnitude of the win/loss bonus.
    pub terminal_score: f64,

    /// Wall-clock budget per `select_move` call.
    pub time_budget: Duration,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            first_n_strategy: 21,
            playout_depth: 21,
            action_masking_time: 6,
            discount_score: 0.9,
            exploration_constant: std::f64::consts::FRAC_1_SQRT_2,
            terminal_score: 1000.0,
            time_budget: Duration::from_millis(1000),
        }
    }
}

impl MctsConfig {
    /// Build from the `[mcts]` section of the central config.
    pub fn from_central(central: &engine_config::MctsConfig) -> Self {
        Self {
            first_n_strategy: central.first_n_strategy,
            playout_depth: central.playout_depth,
            action_masking_time: central.action_masking_time,
            discount_score: central.discount_score,
            exploration_constant: central.exploration_constant,
            terminal_score: central.terminal_score,
            time_budget: Duration::from_millis(central.time_budget_ms),
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            first_n_strategy: 4,
            playout_depth: 8,
            time_budget: Duration::from_millis(20),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.discount_score > 0.0 && self.discount_score <= 1.0) {
            return Err(ConfigError::Discount(self.discount_score));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ConfigError::Exploration(self.exploration_constant));
        }
        if !self.terminal_score.is_finite() || self.terminal_score <= 0.0 {
            return Err(ConfigError::TerminalScore(self.terminal_score));
        }
        Ok(())
    }

    /// Builder pattern: set the solver-guided playout prefix.
    pub fn with_first_n_strategy(mut self, plies: u32) -> Self {
        self.first_n_strategy = plies;
        self
    }

    /// Builder pattern: set the playout ply cap.
    pub fn with_playout_depth(mut self, plies: u32) -> Self {
        self.playout_depth = plies;
        self
    }

    /// Builder pattern: set the opening mask window.
    pub fn with_action_masking_time(mut self, plies: u32) -> Self {
        self.action_masking_time = plies;
        self
    }

    /// Builder pattern: set the per-ply discount.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount_score = discount;
        self
    }

    /// Builder pattern: set the UCT exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_terminal_score(mut self, score: f64) -> Self {
        self.terminal_score = score;
        self
    }

    /// Builder pattern: set the per-move time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }
}
