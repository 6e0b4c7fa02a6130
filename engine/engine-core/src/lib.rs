//! Core types and collaborator contracts for the Pobo engine
//!
//! This crate provides the pieces every other crate agrees on:
//! - `board`: colors, piece kinds, positions and moves
//! - `BoardEncoding`: the flat grid/pool form handed to the oracles
//! - `Rules`: the rules engine contract the search drives
//! - `Solver` / `Heuristic`: the external move and evaluation oracles
//! - `game_utils`: ply helpers shared by expansion and playouts

pub mod board;
pub mod encoding;
pub mod game_utils;
pub mod oracle;
pub mod rules;

// Re-export main types for convenience
pub use board::{Color, Move, Piece, PieceKind, Position};
pub use encoding::BoardEncoding;
pub use game_utils::{play_ply, random_graduation, terminal_reward, winner_after, PlyOutcome};
pub use oracle::{
    ForbiddenMove, Heuristic, NeutralHeuristic, NoSolver, OracleError, Solver, SolverReply,
    NO_SOLUTION,
};
pub use rules::Rules;
