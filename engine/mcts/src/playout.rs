//! Oracle-guided playouts.
//!
//! A playout runs forward from a freshly expanded node on a private copy of
//! its state. The first `first_n_strategy` plies ask the solver for a move,
//! later plies are uniformly random. Every non-final ply adds the discounted
//! heuristic value of the resulting position, and a win ends the playout
//! with a discounted terminal bonus.

use engine_core::{
    play_ply, terminal_reward, Color, ForbiddenMove, Heuristic, Move, Rules, Solver,
};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::config::MctsConfig;
use crate::search::SearchError;

/// Outcome of a single playout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayoutResult {
    /// Accumulated score from the playout's perspective
    pub score: f64,
    /// Plies simulated
    pub plies: u32,
    /// Winner, if the playout ended in a victory
    pub winner: Option<Color>,
    pub solver_calls: u32,
    /// Solver calls that returned no solution
    pub solver_fallbacks: u32,
}

/// Ask the solver for a move in `state`.
///
/// `forbidden` moves are passed on to the solver. A proposal must be one of
/// `candidates`; anything else is a hard error. Returns `Ok(None)` when the
/// solver has no solution.
pub(crate) fn consult_solver<G: Rules, S: Solver>(
    rules: &G,
    solver: &S,
    state: &G::State,
    forbidden: &[Move],
    candidates: &[Move],
) -> Result<Option<Move>, SearchError> {
    let board = rules.encode(state);
    let forbidden: Vec<ForbiddenMove> = forbidden.iter().map(ForbiddenMove::from).collect();
    let reply = solver.solve(&board, &forbidden);

    let proposed = reply.to_move(rules.current_player(state), rules.board_size())?;
    match proposed {
        None => Ok(None),
        Some(mv) if candidates.contains(&mv) => Ok(Some(mv)),
        Some(mv) => Err(SearchError::IllegalSolverMove { mv }),
    }
}

/// Simulate forward from `start`, scoring from `perspective`.
pub fn run_playout<G, S, H, R>(
    rules: &G,
    solver: &S,
    heuristic: &H,
    config: &MctsConfig,
    start: &G::State,
    perspective: Color,
    rng: &mut R,
) -> Result<PlayoutResult, SearchError>
where
    G: Rules,
    S: Solver,
    H: Heuristic,
    R: Rng + ?Sized,
{
    let mut state = start.clone();
    let mut result = PlayoutResult::default();
    // discount^(ply - 1) for the ply about to be scored
    let mut weight = 1.0;

    while result.plies < config.playout_depth {
        let legal = rules.legal_moves(&state);
        if legal.is_empty() {
            break;
        }

        let guided = if result.plies < config.first_n_strategy {
            result.solver_calls += 1;
            let proposal = consult_solver(rules, solver, &state, &[], &legal)?;
            if proposal.is_none() {
                result.solver_fallbacks += 1;
            }
            proposal
        } else {
            None
        };

        let Some(mv) = guided.or_else(|| legal.choose(rng).copied()) else {
            break;
        };

        let ply = play_ply(rules, &state, mv, rng);
        state = ply.state;
        result.plies += 1;

        if let Some(winner) = ply.winner {
            result.winner = Some(winner);
            result.score += weight * terminal_reward(Some(winner), perspective, config.terminal_score);
            break;
        }

        result.score += weight * heuristic.evaluate(&rules.encode(&state), perspective);
        weight *= config.discount_score;
    }

    trace!(
        plies = result.plies,
        score = result.score,
        winner = ?result.winner,
        "playout finished"
    );

    Ok(result)
}
