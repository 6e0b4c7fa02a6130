//! Fixed-size grid encoding handed to the solver and heuristic oracles.

use crate::board::{Color, Piece, PieceKind, Position};
use serde::{Deserialize, Serialize};

/// Snapshot of a position in the flat form the oracles consume.
///
/// `grid` is row-major with one signed piece code per cell (`0` = empty).
/// Pools list the unsigned kind codes still available to each player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEncoding {
    pub size: u8,
    pub grid: Vec<i8>,
    pub blue_pool: Vec<u8>,
    pub red_pool: Vec<u8>,
    pub to_move: Color,
}

impl BoardEncoding {
    /// Empty board with empty pools.
    pub fn empty(size: u8, to_move: Color) -> Self {
        Self {
            size,
            grid: vec![0; size as usize * size as usize],
            blue_pool: Vec::new(),
            red_pool: Vec::new(),
            to_move,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<Piece> {
        self.grid
            .get(pos.index(self.size))
            .and_then(|&code| Piece::from_code(code))
    }

    pub fn set_cell(&mut self, pos: Position, piece: Option<Piece>) {
        let idx = pos.index(self.size);
        self.grid[idx] = piece.map_or(0, Piece::code);
    }

    pub fn pool(&self, color: Color) -> &[u8] {
        match color {
            Color::Blue => &self.blue_pool,
            Color::Red => &self.red_pool,
        }
    }

    pub fn pool_mut(&mut self, color: Color) -> &mut Vec<u8> {
        match color {
            Color::Blue => &mut self.blue_pool,
            Color::Red => &mut self.red_pool,
        }
    }

    #[inline]
    pub fn blue_turn(&self) -> bool {
        self.to_move == Color::Blue
    }

    /// Count of `kind` pieces of `color` on the grid.
    pub fn count_on_board(&self, color: Color, kind: PieceKind) -> usize {
        let code = Piece::new(color, kind).code();
        self.grid.iter().filter(|&&c| c == code).count()
    }

    /// Count of `kind` pieces left in `color`'s pool.
    pub fn count_in_pool(&self, color: Color, kind: PieceKind) -> usize {
        let code = kind.code();
        self.pool(color).iter().filter(|&&c| c == code).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_row_major() {
        let mut enc = BoardEncoding::empty(6, Color::Red);
        let pos = Position::new(4, 1);
        enc.set_cell(pos, Some(Piece::new(Color::Blue, PieceKind::Bo)));

        assert_eq!(enc.grid[6 + 4], -2);
        assert_eq!(enc.cell(pos), Some(Piece::new(Color::Blue, PieceKind::Bo)));
        assert_eq!(enc.count_on_board(Color::Blue, PieceKind::Bo), 1);

        enc.set_cell(pos, None);
        assert_eq!(enc.cell(pos), None);
    }

    #[test]
    fn pools_are_per_color() {
        let mut enc = BoardEncoding::empty(6, Color::Blue);
        enc.pool_mut(Color::Blue).extend([1, 1, 2]);
        enc.pool_mut(Color::Red).push(1);

        assert!(enc.blue_turn());
        assert_eq!(enc.count_in_pool(Color::Blue, PieceKind::Po), 2);
        assert_eq!(enc.count_in_pool(Color::Blue, PieceKind::Bo), 1);
        assert_eq!(enc.count_in_pool(Color::Red, PieceKind::Bo), 0);
    }
}
