//! Rules engine contract consumed by the search.
//!
//! The search never inspects a game state directly. Everything it needs
//! (legal moves, applying a move, graduation groups, victory, the oracle
//! encoding) goes through this trait, so any placement game with Po/Bo
//! pieces and pools can be plugged in.

use crate::board::{Color, Move, Position};
use crate::encoding::BoardEncoding;
use std::fmt::Debug;

/// Rules of a two-player placement game.
///
/// Implementations must be deterministic: the same state and move always
/// produce the same result. All operations are pure and return new states;
/// snapshots held by search nodes are never mutated in place.
///
/// A ply is `apply`, then optional `graduate`, then `advance_turn`. Between
/// `apply` and `advance_turn` the mover is still `current_player`, which is
/// how `graduation_groups` knows whose lines to report.
pub trait Rules: Send + Sync + Debug {
    /// Full game state: board, pools, move counter and player to move.
    type State: Clone + PartialEq + Debug + Send;

    /// Side length of the square board.
    fn board_size(&self) -> u8;

    fn current_player(&self, state: &Self::State) -> Color;

    /// Number of plies played so far in the real game.
    fn move_number(&self, state: &Self::State) -> u32;

    /// All legal placements for the player to move.
    fn legal_moves(&self, state: &Self::State) -> Vec<Move>;

    /// Place the piece and apply its immediate effects. Does not change turn.
    fn apply(&self, state: &Self::State, mv: Move) -> Self::State;

    /// Tied candidate groups the mover may graduate after `apply`.
    /// Empty when nothing qualifies.
    fn graduation_groups(&self, state: &Self::State) -> Vec<Vec<Position>>;

    /// Remove the pieces in `group` and return them upgraded to their owners.
    fn graduate(&self, state: &Self::State, group: &[Position]) -> Self::State;

    fn is_victory(&self, state: &Self::State, color: Color) -> bool;

    /// Hand the turn to the other player and bump the move counter.
    fn advance_turn(&self, state: &Self::State) -> Self::State;

    /// Oracle encoding of the state.
    fn encode(&self, state: &Self::State) -> BoardEncoding;
}
