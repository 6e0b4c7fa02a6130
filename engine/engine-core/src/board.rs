//! Board value types shared by the rules engine, the oracles and the search.
//!
//! Pieces travel across the oracle boundary as signed integer codes: the
//! magnitude is the kind (`1` = Po, `2` = Bo) and the sign is the owner
//! (Blue negative, Red positive).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    #[inline]
    pub fn other(self) -> Color {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Blue,
        }
    }

    /// Sign applied to piece codes owned by this color.
    #[inline]
    pub fn code_sign(self) -> i8 {
        match self {
            Color::Blue => -1,
            Color::Red => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Blue => write!(f, "blue"),
            Color::Red => write!(f, "red"),
        }
    }
}

/// Small (Po) or promoted (Bo) piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Po,
    Bo,
}

impl PieceKind {
    /// Unsigned kind code used by the oracles.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            PieceKind::Po => 1,
            PieceKind::Bo => 2,
        }
    }

    /// Decode a kind from either a signed or an unsigned code.
    pub fn from_code(code: i32) -> Option<PieceKind> {
        match code.unsigned_abs() {
            1 => Some(PieceKind::Po),
            2 => Some(PieceKind::Bo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Signed grid code for this piece.
    #[inline]
    pub fn code(self) -> i8 {
        self.color.code_sign() * self.kind.code() as i8
    }

    /// Decode a signed grid code. `0` (empty) and unknown codes yield `None`.
    pub fn from_code(code: i8) -> Option<Piece> {
        let kind = PieceKind::from_code(code as i32)?;
        let color = if code < 0 { Color::Blue } else { Color::Red };
        Some(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::Blue => 'b',
            Color::Red => 'r',
        };
        let kind = match self.kind {
            PieceKind::Po => "po",
            PieceKind::Bo => "bo",
        };
        write!(f, "{}{}", color, kind)
    }
}

/// Board coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// True when the position lies on the outermost ring of a square board.
    #[inline]
    pub fn is_on_border(self, board_size: u8) -> bool {
        let last = board_size.saturating_sub(1);
        self.x == 0 || self.y == 0 || self.x == last || self.y == last
    }

    /// Row-major index into a grid of `board_size` columns.
    #[inline]
    pub fn index(self, board_size: u8) -> usize {
        self.y as usize * board_size as usize + self.x as usize
    }

    /// Neighbour one step along `(dx, dy)`, or `None` if it leaves the board.
    pub fn offset(self, dx: i8, dy: i8, board_size: u8) -> Option<Position> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        let size = board_size as i16;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Position::new(x as u8, y as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Placement of a piece from the mover's pool onto `to`.
///
/// Two moves are equal when they place the same kind on the same cell. The
/// color is implied by whose turn it is, so it takes no part in equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Move {
    pub piece: Piece,
    pub to: Position,
}

impl Move {
    pub fn new(piece: Piece, to: Position) -> Self {
        Self { piece, to }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.piece.kind == other.piece.kind && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.piece.kind.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.piece, self.to)
    }
}
