//! Oracle-guided Monte Carlo Tree Search for Pobo.
//!
//! This crate provides a move-selection engine that works with any rules
//! implementing the `engine-core` [`Rules`](engine_core::Rules) trait, biased
//! by two external oracles: a move [`Solver`](engine_core::Solver) and a
//! static position [`Heuristic`](engine_core::Heuristic).
//!
//! # Overview
//!
//! Each call to [`MctsEngine::select_move`] runs iterations until its time
//! budget is spent:
//!
//! 1. **Selection**: descend from the current root with UCT, skipping border
//!    moves during the opening, until a node with unexpanded moves is found
//! 2. **Expansion**: add one child, proposed by the solver or drawn at
//!    random from the remaining legal moves
//! 3. **Simulation**: play forward with the solver for the first plies and
//!    random moves after, summing discounted heuristic values, with a large
//!    bonus when someone wins
//! 4. **Backpropagation**: add the score along the path, negating it at every
//!    level
//!
//! The move played is the visited root child with the best total score. The
//! tree is kept between turns and re-rooted on the opponent's move.
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//! use engine_core::Color;
//! use games_lineup::{GreedySolver, Lineup, MaterialHeuristic};
//! use mcts::{MctsConfig, MctsEngine};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let rules = Lineup::default();
//! let state = rules.initial_state(Color::Red);
//!
//! let mut engine = MctsEngine::new(
//!     rules,
//!     GreedySolver::default(),
//!     MaterialHeuristic::default(),
//!     MctsConfig::for_testing(),
//!     ChaCha20Rng::seed_from_u64(42),
//! )
//! .unwrap();
//!
//! let mv = engine
//!     .select_move(&state, None, Duration::from_millis(20))
//!     .unwrap();
//! println!("Best move: {mv}");
//! println!("Iterations: {}", engine.last_stats().iterations);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `first_n_strategy`: playout plies guided by the solver (default: 21)
//! - `playout_depth`: playout ply cap (default: 21)
//! - `action_masking_time`: opening plies with border moves masked (default: 6)
//! - `discount_score`: per-ply playout discount (default: 0.9)
//! - `exploration_constant`: UCT exploration weight (default: √2/2)

pub mod config;
pub mod mask;
pub mod node;
pub mod playout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{ConfigError, MctsConfig};
pub use mask::ActionMask;
pub use node::{NodeId, SearchNode};
pub use playout::{run_playout, PlayoutResult};
pub use search::{MctsEngine, SearchError, SearchStats};
pub use tree::{MctsTree, TreeStats};
