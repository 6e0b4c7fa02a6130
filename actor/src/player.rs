//! Move selection for the two seats of a match

use anyhow::{anyhow, Result};
use engine_core::{random_graduation, Move, Position, Rules};
use games_lineup::{GreedySolver, Lineup, LineupState, MaterialHeuristic};
use mcts::{MctsConfig, MctsEngine, SearchError};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::time::Duration;
use tracing::warn;

use crate::config::PlayerKind;

/// Trait for anything that can sit at the board.
pub trait Player {
    fn kind(&self) -> PlayerKind;

    /// Called before the first move of every game.
    fn new_game(&mut self);

    /// Choose a move in `state`, given the opponent's last move.
    fn select_move(&mut self, state: &LineupState, opponent_last_move: Option<Move>)
        -> Result<Move>;

    /// Choose the graduation group after this player's own move. Empty when
    /// nothing qualifies.
    fn select_graduation(&mut self, state: &LineupState) -> Vec<Position>;

    /// Search iterations spent on the last move, if the player searches.
    fn last_iterations(&self) -> Option<u32> {
        None
    }
}

/// Build a player of `kind`. `seed` of `None` draws from entropy.
pub fn build_player(
    kind: PlayerKind,
    rules: Lineup,
    config: &MctsConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Player>> {
    let rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    Ok(match kind {
        PlayerKind::Mcts => Box::new(MctsPlayer::new(rules, config.clone(), rng)?),
        PlayerKind::Random => Box::new(RandomPlayer::new(rules, rng)),
    })
}

/// Player that picks uniformly among legal moves.
#[derive(Debug)]
pub struct RandomPlayer {
    rules: Lineup,
    rng: ChaCha20Rng,
}

impl RandomPlayer {
    pub fn new(rules: Lineup, rng: ChaCha20Rng) -> Self {
        Self { rules, rng }
    }
}

impl Player for RandomPlayer {
    fn kind(&self) -> PlayerKind {
        PlayerKind::Random
    }

    fn new_game(&mut self) {}

    fn select_move(&mut self, state: &LineupState, _opponent_last_move: Option<Move>) -> Result<Move> {
        self.rules
            .legal_moves(state)
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no legal moves for {}", state.current_player()))
    }

    fn select_graduation(&mut self, state: &LineupState) -> Vec<Position> {
        random_graduation(&self.rules, state, &mut self.rng).unwrap_or_default()
    }
}

/// Player backed by the oracle-guided tree search.
pub struct MctsPlayer {
    engine: MctsEngine<Lineup, GreedySolver, MaterialHeuristic, ChaCha20Rng>,
    budget: Duration,
}

impl MctsPlayer {
    pub fn new(rules: Lineup, config: MctsConfig, rng: ChaCha20Rng) -> Result<Self> {
        let budget = config.time_budget;
        let engine = MctsEngine::new(
            rules,
            GreedySolver::new(rules.pool_size()),
            MaterialHeuristic::default(),
            config,
            rng,
        )?;
        Ok(Self { engine, budget })
    }
}

impl Player for MctsPlayer {
    fn kind(&self) -> PlayerKind {
        PlayerKind::Mcts
    }

    fn new_game(&mut self) {
        self.engine.new_game();
    }

    fn select_move(&mut self, state: &LineupState, opponent_last_move: Option<Move>) -> Result<Move> {
        match self.engine.select_move(state, opponent_last_move, self.budget) {
            Ok(mv) => Ok(mv),
            Err(SearchError::Desynchronized { opponent_move }) => {
                // The failed call already dropped the tree; start over here.
                warn!(%opponent_move, "search tree lost track of the game, rebuilding");
                self.engine.new_game();
                Ok(self
                    .engine
                    .select_move(state, opponent_last_move, self.budget)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn select_graduation(&mut self, state: &LineupState) -> Vec<Position> {
        self.engine.select_graduation(state)
    }

    fn last_iterations(&self) -> Option<u32> {
        Some(self.engine.last_stats().iterations)
    }
}
