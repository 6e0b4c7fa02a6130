//! Lineup: a compact push-and-graduate placement game
//!
//! This crate provides a complete [`Rules`] implementation the search can be
//! driven with, plus a greedy solver and a material heuristic for the oracle
//! slots.
//!
//! # Rules
//!
//! - Square board (6x6 by default). Each player starts with a pool of Po.
//! - A move places a piece from the mover's pool on an empty cell. The new
//!   piece pushes every adjacent piece one cell straight away from it when
//!   that cell is free. A piece pushed off the board goes back to its owner's
//!   pool. A Po cannot push a Bo.
//! - Three of the mover's pieces in a straight line, at least one of them a
//!   Po, may graduate: they leave the board and return to the pool as Bo. If
//!   the mover has no such line and an empty pool, any single piece of theirs
//!   may graduate instead.
//! - Three Bo in a line, or every piece on the board as a Bo, wins.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Color, Rules};
//! use games_lineup::Lineup;
//!
//! let rules = Lineup::default();
//! let state = rules.initial_state(Color::Red);
//! assert_eq!(rules.legal_moves(&state).len(), 36);
//! ```

use engine_core::{BoardEncoding, Color, Move, Piece, PieceKind, Position, Rules};

mod oracle;

pub use oracle::{GreedySolver, MaterialHeuristic};

/// The eight push directions.
const NEIGHBOURS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Directions a line of three can run in.
const LINE_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Pieces a player holds off the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pool {
    pub po: u8,
    pub bo: u8,
}

impl Pool {
    pub fn count(&self, kind: PieceKind) -> u8 {
        match kind {
            PieceKind::Po => self.po,
            PieceKind::Bo => self.bo,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.po == 0 && self.bo == 0
    }

    fn add(&mut self, kind: PieceKind) {
        match kind {
            PieceKind::Po => self.po += 1,
            PieceKind::Bo => self.bo += 1,
        }
    }

    fn take(&mut self, kind: PieceKind) {
        match kind {
            PieceKind::Po => self.po = self.po.saturating_sub(1),
            PieceKind::Bo => self.bo = self.bo.saturating_sub(1),
        }
    }

    /// Kind codes in oracle order: every Po, then every Bo.
    fn codes(&self) -> Vec<u8> {
        let mut out = vec![PieceKind::Po.code(); self.po as usize];
        out.extend(std::iter::repeat(PieceKind::Bo.code()).take(self.bo as usize));
        out
    }
}

/// Lineup game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupState {
    size: u8,
    cells: Vec<Option<Piece>>,
    blue_pool: Pool,
    red_pool: Pool,
    current: Color,
    move_number: u32,
}

impl LineupState {
    /// Rebuild a state from its oracle encoding. The move counter is not
    /// part of the encoding and restarts at zero.
    pub fn from_encoding(board: &BoardEncoding) -> Self {
        let pool_from = |codes: &[u8]| {
            let mut pool = Pool::default();
            for &code in codes {
                if let Some(kind) = PieceKind::from_code(code as i32) {
                    pool.add(kind);
                }
            }
            pool
        };

        Self {
            size: board.size,
            cells: board.grid.iter().map(|&c| Piece::from_code(c)).collect(),
            blue_pool: pool_from(&board.blue_pool),
            red_pool: pool_from(&board.red_pool),
            current: board.to_move,
            move_number: 0,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<Piece> {
        self.cells.get(pos.index(self.size)).copied().flatten()
    }

    pub fn pool(&self, color: Color) -> &Pool {
        match color {
            Color::Blue => &self.blue_pool,
            Color::Red => &self.red_pool,
        }
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Place `piece` at `pos` without any rule effects. Used to set up
    /// positions in tests and benches.
    pub fn with_piece(mut self, pos: Position, piece: Piece) -> Self {
        let idx = pos.index(self.size);
        self.cells[idx] = Some(piece);
        self
    }

    /// Replace `color`'s pool.
    pub fn with_pool(mut self, color: Color, pool: Pool) -> Self {
        *self.pool_mut(color) = pool;
        self
    }

    fn pool_mut(&mut self, color: Color) -> &mut Pool {
        match color {
            Color::Blue => &mut self.blue_pool,
            Color::Red => &mut self.red_pool,
        }
    }

    fn set(&mut self, pos: Position, piece: Option<Piece>) {
        let idx = pos.index(self.size);
        self.cells[idx] = piece;
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Position::new(x, y)))
    }

    /// Every on-board window of three cells in a straight line.
    fn windows(&self) -> Vec<[Position; 3]> {
        let size = self.size;
        let mut out = Vec::new();
        for start in self.positions() {
            for (dx, dy) in LINE_DIRECTIONS {
                let second = start.offset(dx, dy, size);
                let third = second.and_then(|p| p.offset(dx, dy, size));
                if let (Some(second), Some(third)) = (second, third) {
                    out.push([start, second, third]);
                }
            }
        }
        out
    }

    /// Lines of three held entirely by `color` that contain a Po.
    pub fn graduating_lines(&self, color: Color) -> Vec<Vec<Position>> {
        self.windows()
            .into_iter()
            .filter(|window| {
                let pieces: Vec<_> = window.iter().filter_map(|&p| self.cell(p)).collect();
                pieces.len() == 3
                    && pieces.iter().all(|p| p.color == color)
                    && pieces.iter().any(|p| p.kind == PieceKind::Po)
            })
            .map(|window| window.to_vec())
            .collect()
    }

    fn count_on_board(&self, color: Color, kind: PieceKind) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|p| p.color == color && p.kind == kind)
            .count()
    }
}

/// Lineup rules
#[derive(Debug, Clone, Copy)]
pub struct Lineup {
    size: u8,
    pool_size: u8,
}

impl Lineup {
    pub fn new(size: u8, pool_size: u8) -> Self {
        Self { size, pool_size }
    }

    pub fn pool_size(&self) -> u8 {
        self.pool_size
    }

    /// Empty board with full pools of Po, `first` to move.
    pub fn initial_state(&self, first: Color) -> LineupState {
        let pool = Pool {
            po: self.pool_size,
            bo: 0,
        };
        LineupState {
            size: self.size,
            cells: vec![None; self.size as usize * self.size as usize],
            blue_pool: pool,
            red_pool: pool,
            current: first,
            move_number: 0,
        }
    }

    fn push_neighbours(&self, state: &mut LineupState, placed: Piece, at: Position) {
        for (dx, dy) in NEIGHBOURS {
            let Some(from) = at.offset(dx, dy, self.size) else {
                continue;
            };
            let Some(target) = state.cell(from) else {
                continue;
            };
            if placed.kind == PieceKind::Po && target.kind == PieceKind::Bo {
                continue;
            }

            match from.offset(dx, dy, self.size) {
                None => {
                    state.set(from, None);
                    state.pool_mut(target.color).add(target.kind);
                }
                Some(to) if state.cell(to).is_none() => {
                    state.set(from, None);
                    state.set(to, Some(target));
                }
                Some(_) => {}
            }
        }
    }
}

impl Default for Lineup {
    fn default() -> Self {
        Self::new(6, 8)
    }
}

impl Rules for Lineup {
    type State = LineupState;

    fn board_size(&self) -> u8 {
        self.size
    }

    fn current_player(&self, state: &LineupState) -> Color {
        state.current
    }

    fn move_number(&self, state: &LineupState) -> u32 {
        state.move_number
    }

    fn legal_moves(&self, state: &LineupState) -> Vec<Move> {
        let pool = state.pool(state.current);
        let mut moves = Vec::new();
        for kind in [PieceKind::Po, PieceKind::Bo] {
            if pool.count(kind) == 0 {
                continue;
            }
            let piece = Piece::new(state.current, kind);
            moves.extend(
                state
                    .positions()
                    .filter(|&p| state.cell(p).is_none())
                    .map(|p| Move::new(piece, p)),
            );
        }
        moves
    }

    fn apply(&self, state: &LineupState, mv: Move) -> LineupState {
        let mut next = state.clone();
        let piece = Piece::new(state.current, mv.kind());
        next.pool_mut(piece.color).take(piece.kind);
        next.set(mv.to, Some(piece));
        self.push_neighbours(&mut next, piece, mv.to);
        next
    }

    fn graduation_groups(&self, state: &LineupState) -> Vec<Vec<Position>> {
        let mover = state.current;
        let lines = state.graduating_lines(mover);
        if !lines.is_empty() || !state.pool(mover).is_empty() {
            return lines;
        }
        state
            .positions()
            .filter(|&p| matches!(state.cell(p), Some(piece) if piece.color == mover))
            .map(|p| vec![p])
            .collect()
    }

    fn graduate(&self, state: &LineupState, group: &[Position]) -> LineupState {
        let mut next = state.clone();
        for &pos in group {
            if let Some(piece) = next.cell(pos) {
                next.set(pos, None);
                next.pool_mut(piece.color).add(PieceKind::Bo);
            }
        }
        next
    }

    fn is_victory(&self, state: &LineupState, color: Color) -> bool {
        let bo = Piece::new(color, PieceKind::Bo);
        let three_bo = state
            .windows()
            .iter()
            .any(|window| window.iter().all(|&p| state.cell(p) == Some(bo)));
        three_bo || state.count_on_board(color, PieceKind::Bo) == self.pool_size as usize
    }

    fn advance_turn(&self, state: &LineupState) -> LineupState {
        let mut next = state.clone();
        next.current = state.current.other();
        next.move_number += 1;
        next
    }

    fn encode(&self, state: &LineupState) -> BoardEncoding {
        BoardEncoding {
            size: state.size,
            grid: state
                .cells
                .iter()
                .map(|cell| cell.map_or(0, Piece::code))
                .collect(),
            blue_pool: state.blue_pool.codes(),
            red_pool: state.red_pool.codes(),
            to_move: state.current,
        }
    }
}
