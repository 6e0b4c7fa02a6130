//! Oracles for Lineup positions.

use crate::{Lineup, LineupState};
use engine_core::{
    BoardEncoding, Color, ForbiddenMove, Heuristic, Move, PieceKind, Rules, Solver, SolverReply,
};

/// One-ply greedy solver.
///
/// Proposes the first allowed move that wins outright (cost 0), otherwise the
/// first that completes a graduating line (cost 1), otherwise reports no
/// solution.
#[derive(Debug, Clone, Copy)]
pub struct GreedySolver {
    pool_size: u8,
}

impl GreedySolver {
    pub fn new(pool_size: u8) -> Self {
        Self { pool_size }
    }

    fn reply(mv: Move, cost: i32) -> SolverReply {
        SolverReply::Placement {
            piece: mv.kind().code() as i32,
            row: mv.to.y as i32,
            column: mv.to.x as i32,
            cost,
        }
    }
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new(Lineup::default().pool_size())
    }
}

impl Solver for GreedySolver {
    fn solve(&self, board: &BoardEncoding, forbidden: &[ForbiddenMove]) -> SolverReply {
        let rules = Lineup::new(board.size, self.pool_size);
        let state = LineupState::from_encoding(board);
        let mover = board.to_move;

        let mut graduating = None;
        for mv in rules.legal_moves(&state) {
            if forbidden.iter().any(|f| f.matches(&mv)) {
                continue;
            }
            let next = rules.apply(&state, mv);
            if rules.is_victory(&next, mover) {
                return Self::reply(mv, 0);
            }
            if graduating.is_none() && !next.graduating_lines(mover).is_empty() {
                graduating = Some(mv);
            }
        }

        graduating.map_or(SolverReply::NoSolution, |mv| Self::reply(mv, 1))
    }
}

/// Weighted material count, own pieces minus the opponent's.
#[derive(Debug, Clone, Copy)]
pub struct MaterialHeuristic {
    pub board_bo: f64,
    pub board_po: f64,
    pub pool_bo: f64,
    pub pool_po: f64,
}

impl Default for MaterialHeuristic {
    fn default() -> Self {
        Self {
            board_bo: 3.0,
            board_po: 1.0,
            pool_bo: 2.0,
            pool_po: 0.5,
        }
    }
}

impl MaterialHeuristic {
    fn material(&self, board: &BoardEncoding, color: Color) -> f64 {
        self.board_bo * board.count_on_board(color, PieceKind::Bo) as f64
            + self.board_po * board.count_on_board(color, PieceKind::Po) as f64
            + self.pool_bo * board.count_in_pool(color, PieceKind::Bo) as f64
            + self.pool_po * board.count_in_pool(color, PieceKind::Po) as f64
    }
}

impl Heuristic for MaterialHeuristic {
    fn evaluate(&self, board: &BoardEncoding, perspective: Color) -> f64 {
        self.material(board, perspective) - self.material(board, perspective.other())
    }
}
