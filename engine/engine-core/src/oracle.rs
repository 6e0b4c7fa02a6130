//! Solver and heuristic oracle interfaces.
//!
//! Both oracles are stateless functions of a [`BoardEncoding`]. The solver
//! answers in the native four-integer form `[piece, row, column, cost]`,
//! where a piece code of [`NO_SOLUTION`] means it found nothing worth
//! playing. Replies are decoded here and validated before the search ever
//! sees a [`Move`].

use crate::board::{Color, Move, Piece, PieceKind, Position};
use crate::encoding::BoardEncoding;
use thiserror::Error;

/// Piece code the solver returns when it has no proposal.
pub const NO_SOLUTION: i32 = 42;

/// Errors raised while decoding an oracle reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("solver reply has {len} fields, expected 4")]
    Truncated { len: usize },

    #[error("solver returned unknown piece code {0}")]
    UnknownPieceCode(i32),

    #[error("solver placed at row {row}, column {column} outside a {size}x{size} board")]
    OutOfBoard { row: i32, column: i32, size: u8 },
}

/// Move the solver must not propose, in the solver's own terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForbiddenMove {
    pub row: u8,
    pub column: u8,
    /// Unsigned kind code (1 = Po, 2 = Bo).
    pub piece: u8,
}

impl From<&Move> for ForbiddenMove {
    fn from(mv: &Move) -> Self {
        Self {
            row: mv.to.y,
            column: mv.to.x,
            piece: mv.piece.kind.code(),
        }
    }
}

impl ForbiddenMove {
    pub fn matches(&self, mv: &Move) -> bool {
        *self == ForbiddenMove::from(mv)
    }
}

/// Decoded solver answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverReply {
    NoSolution,
    Placement {
        piece: i32,
        row: i32,
        column: i32,
        cost: i32,
    },
}

impl SolverReply {
    /// Decode the raw `[piece, row, column, cost]` reply.
    pub fn from_raw(raw: &[i32]) -> Result<SolverReply, OracleError> {
        match raw {
            [NO_SOLUTION, ..] => Ok(SolverReply::NoSolution),
            [piece, row, column, cost, ..] => Ok(SolverReply::Placement {
                piece: *piece,
                row: *row,
                column: *column,
                cost: *cost,
            }),
            _ => Err(OracleError::Truncated { len: raw.len() }),
        }
    }

    /// Convert a placement into a move for `mover`.
    ///
    /// Returns `Ok(None)` for [`SolverReply::NoSolution`]. The piece code may
    /// be signed or unsigned; only its magnitude is used.
    pub fn to_move(self, mover: Color, board_size: u8) -> Result<Option<Move>, OracleError> {
        let (piece, row, column) = match self {
            SolverReply::NoSolution => return Ok(None),
            SolverReply::Placement {
                piece, row, column, ..
            } => (piece, row, column),
        };

        let kind = PieceKind::from_code(piece).ok_or(OracleError::UnknownPieceCode(piece))?;
        let size = board_size as i32;
        if !(0..size).contains(&row) || !(0..size).contains(&column) {
            return Err(OracleError::OutOfBoard {
                row,
                column,
                size: board_size,
            });
        }

        Ok(Some(Move::new(
            Piece::new(mover, kind),
            Position::new(column as u8, row as u8),
        )))
    }
}

/// Move oracle consulted during expansion and early playout plies.
pub trait Solver {
    fn solve(&self, board: &BoardEncoding, forbidden: &[ForbiddenMove]) -> SolverReply;
}

impl<F> Solver for F
where
    F: Fn(&BoardEncoding, &[ForbiddenMove]) -> SolverReply,
{
    fn solve(&self, board: &BoardEncoding, forbidden: &[ForbiddenMove]) -> SolverReply {
        self(board, forbidden)
    }
}

/// Static position evaluator. Higher is better for `perspective`.
pub trait Heuristic {
    fn evaluate(&self, board: &BoardEncoding, perspective: Color) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&BoardEncoding, Color) -> f64,
{
    fn evaluate(&self, board: &BoardEncoding, perspective: Color) -> f64 {
        self(board, perspective)
    }
}

/// Solver that never has an answer. Search degrades to random moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSolver;

impl Solver for NoSolver {
    fn solve(&self, _board: &BoardEncoding, _forbidden: &[ForbiddenMove]) -> SolverReply {
        SolverReply::NoSolution
    }
}

/// Heuristic that scores every position as even.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralHeuristic;

impl Heuristic for NeutralHeuristic {
    fn evaluate(&self, _board: &BoardEncoding, _perspective: Color) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_decodes_to_no_solution() {
        assert_eq!(
            SolverReply::from_raw(&[NO_SOLUTION, 0, 0, 0]),
            Ok(SolverReply::NoSolution)
        );
        // The sentinel alone is enough.
        assert_eq!(
            SolverReply::from_raw(&[NO_SOLUTION]),
            Ok(SolverReply::NoSolution)
        );
    }

    #[test]
    fn test_short_reply_is_rejected() {
        assert_eq!(
            SolverReply::from_raw(&[1, 2]),
            Err(OracleError::Truncated { len: 2 })
        );
        assert_eq!(
            SolverReply::from_raw(&[]),
            Err(OracleError::Truncated { len: 0 })
        );
    }

    #[test]
    fn test_placement_maps_row_and_column() {
        let reply = SolverReply::from_raw(&[2, 1, 4, 7]).unwrap();
        let mv = reply.to_move(Color::Blue, 6).unwrap().unwrap();
        assert_eq!(mv.piece, Piece::new(Color::Blue, PieceKind::Bo));
        assert_eq!(mv.to, Position::new(4, 1));
    }

    #[test]
    fn test_signed_piece_codes_are_accepted() {
        let reply = SolverReply::Placement {
            piece: -1,
            row: 0,
            column: 0,
            cost: 0,
        };
        let mv = reply.to_move(Color::Red, 6).unwrap().unwrap();
        assert_eq!(mv.piece, Piece::new(Color::Red, PieceKind::Po));
    }

    #[test]
    fn test_malformed_placements_are_errors() {
        let bad_piece = SolverReply::Placement {
            piece: 5,
            row: 0,
            column: 0,
            cost: 0,
        };
        assert_eq!(
            bad_piece.to_move(Color::Red, 6),
            Err(OracleError::UnknownPieceCode(5))
        );

        let off_board = SolverReply::Placement {
            piece: 1,
            row: 6,
            column: 0,
            cost: 0,
        };
        assert!(matches!(
            off_board.to_move(Color::Red, 6),
            Err(OracleError::OutOfBoard { row: 6, .. })
        ));
    }

    #[test]
    fn test_forbidden_move_matches_by_kind_and_cell() {
        let mv = Move::new(
            Piece::new(Color::Red, PieceKind::Po),
            Position::new(3, 2),
        );
        let forbidden = ForbiddenMove::from(&mv);
        assert_eq!(
            forbidden,
            ForbiddenMove {
                row: 2,
                column: 3,
                piece: 1
            }
        );
        let blue_same = Move::new(
            Piece::new(Color::Blue, PieceKind::Po),
            Position::new(3, 2),
        );
        assert!(forbidden.matches(&blue_same));
    }

    #[test]
    fn test_closures_act_as_oracles() {
        let board = BoardEncoding::empty(6, Color::Red);
        let solver = |_: &BoardEncoding, forbidden: &[ForbiddenMove]| {
            if forbidden.is_empty() {
                SolverReply::Placement {
                    piece: 1,
                    row: 0,
                    column: 0,
                    cost: 3,
                }
            } else {
                SolverReply::NoSolution
            }
        };
        assert!(matches!(
            solver.solve(&board, &[]),
            SolverReply::Placement { cost: 3, .. }
        ));
        let taken = [ForbiddenMove {
            row: 0,
            column: 0,
            piece: 1,
        }];
        assert_eq!(solver.solve(&board, &taken), SolverReply::NoSolution);

        let heuristic = |_: &BoardEncoding, c: Color| if c == Color::Red { 1.5 } else { -1.5 };
        assert_eq!(heuristic.evaluate(&board, Color::Red), 1.5);
        assert_eq!(NeutralHeuristic.evaluate(&board, Color::Blue), 0.0);
        assert_eq!(NoSolver.solve(&board, &[]), SolverReply::NoSolution);
    }
}
