//! Shared ply helpers built on the [`Rules`] contract.
//!
//! A full ply is always played the same way, whether the search is
//! materialising a new child or running a playout: place the piece, resolve
//! one graduation group chosen uniformly at random, look for a winner, then
//! hand the turn over.

use crate::board::{Color, Move, Position};
use crate::rules::Rules;
use rand::seq::SliceRandom;
use rand::Rng;

/// Result of [`play_ply`].
#[derive(Debug, Clone)]
pub struct PlyOutcome<S> {
    /// State after the ply, with the turn already handed over.
    pub state: S,
    /// Group graduated during the ply, if any.
    pub graduated: Option<Vec<Position>>,
    /// Winner detected after the ply.
    pub winner: Option<Color>,
}

/// Signed terminal reward seen from `perspective`.
///
/// # Example
/// ```
/// use engine_core::board::Color;
/// use engine_core::game_utils::terminal_reward;
///
/// assert_eq!(terminal_reward(Some(Color::Red), Color::Red, 1000.0), 1000.0);
/// assert_eq!(terminal_reward(Some(Color::Red), Color::Blue, 1000.0), -1000.0);
/// assert_eq!(terminal_reward(None, Color::Blue, 1000.0), 0.0);
/// ```
#[inline]
pub fn terminal_reward(winner: Option<Color>, perspective: Color, magnitude: f64) -> f64 {
    match winner {
        Some(color) if color == perspective => magnitude,
        Some(_) => -magnitude,
        None => 0.0,
    }
}

/// Winner of `state`, crediting `mover` when both colors line up at once.
pub fn winner_after<G: Rules>(rules: &G, state: &G::State, mover: Color) -> Option<Color> {
    if rules.is_victory(state, mover) {
        Some(mover)
    } else if rules.is_victory(state, mover.other()) {
        Some(mover.other())
    } else {
        None
    }
}

/// Pick one of the tied graduation groups uniformly at random.
pub fn random_graduation<G: Rules, R: Rng + ?Sized>(
    rules: &G,
    state: &G::State,
    rng: &mut R,
) -> Option<Vec<Position>> {
    rules.graduation_groups(state).choose(rng).cloned()
}

/// Play `mv` from `state` through to the hand-over of the turn.
pub fn play_ply<G: Rules, R: Rng + ?Sized>(
    rules: &G,
    state: &G::State,
    mv: Move,
    rng: &mut R,
) -> PlyOutcome<G::State> {
    let mover = rules.current_player(state);
    let mut next = rules.apply(state, mv);

    let graduated = random_graduation(rules, &next, rng);
    if let Some(group) = &graduated {
        next = rules.graduate(&next, group);
    }

    let winner = winner_after(rules, &next, mover);
    let state = rules.advance_turn(&next);

    PlyOutcome {
        state,
        graduated,
        winner,
    }
}
