//! Search tree node representation.
//!
//! Each node holds its own deep copy of the game state reached by its
//! incoming move, so siblings never alias. Scores are stored from the point
//! of view of the player who made the incoming move (`acting_player`).

use engine_core::{Color, Move, Position};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    /// Parent node index (NONE for the arena root)
    pub parent: NodeId,

    /// Move that produced this node. At a root it is the opponent's last
    /// real move, when known.
    pub incoming_move: Option<Move>,

    /// Game state after the incoming move, turn already handed over
    pub state: S,

    /// Player who made the incoming move
    pub acting_player: Color,

    /// Real-game ply count of `state`
    pub move_number: u32,

    /// Number of legal moves from `state`
    pub legal_move_count: usize,

    /// Number of backpropagations that passed through this node
    pub visit_count: u32,

    /// Sum of backpropagated scores, from `acting_player`'s point of view
    pub cumulative_score: f64,

    /// Whether either player has won in `state`
    pub is_terminal: bool,

    /// Win/loss bonus for `acting_player` (only valid if is_terminal)
    pub terminal_value: f64,

    /// Graduation group resolved while producing `state`, if any
    pub graduated: Option<Vec<Position>>,

    /// Expanded children, in creation order
    pub children: Vec<NodeId>,
}

impl<S> SearchNode<S> {
    /// Create a root node for `state`, where `acting_player` is the player
    /// who is *not* to move.
    #[allow(clippy::too_many_arguments)]
    pub fn new_root(
        state: S,
        acting_player: Color,
        incoming_move: Option<Move>,
        move_number: u32,
        legal_move_count: usize,
        is_terminal: bool,
        terminal_value: f64,
    ) -> Self {
        Self {
            parent: NodeId::NONE,
            incoming_move,
            state,
            acting_player,
            move_number,
            legal_move_count,
            visit_count: 0,
            cumulative_score: if is_terminal { terminal_value } else { 0.0 },
            is_terminal,
            terminal_value,
            graduated: None,
            children: Vec::new(),
        }
    }

    /// Create a new child node.
    ///
    /// Terminal children start with the terminal bonus as a provisional
    /// score; everything else starts neutral.
    #[allow(clippy::too_many_arguments)]
    pub fn new_child(
        parent: NodeId,
        incoming_move: Move,
        state: S,
        acting_player: Color,
        move_number: u32,
        legal_move_count: usize,
        is_terminal: bool,
        terminal_value: f64,
    ) -> Self {
        Self {
            parent,
            incoming_move: Some(incoming_move),
            state,
            acting_player,
            move_number,
            legal_move_count,
            visit_count: 0,
            cumulative_score: if is_terminal { terminal_value } else { 0.0 },
            is_terminal,
            terminal_value,
            graduated: None,
            children: Vec::new(),
        }
    }

    /// Player to move in `state`.
    #[inline]
    pub fn to_move(&self) -> Color {
        self.acting_player.other()
    }

    /// +1 when `viewer` made the incoming move, -1 otherwise.
    #[inline]
    pub fn perspective_sign(&self, viewer: Color) -> f64 {
        if self.acting_player == viewer {
            1.0
        } else {
            -1.0
        }
    }

    /// Average score. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_score(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.cumulative_score / self.visit_count as f64
        }
    }

    /// UCT value of this node as seen by `viewer`, the player choosing among
    /// siblings.
    ///
    /// `sign * Q + c * sqrt(2 ln(N_parent) / N)`. Unvisited nodes score
    /// `f64::INFINITY` so they are always tried first.
    #[inline]
    pub fn uct_value(&self, parent_visits: u32, viewer: Color, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let visits = self.visit_count as f64;
        let exploit = self.perspective_sign(viewer) * self.cumulative_score / visits;
        let explore = exploration * (2.0 * (parent_visits.max(1) as f64).ln() / visits).sqrt();
        exploit + explore
    }

    /// Number of legal moves not yet expanded into children.
    #[inline]
    pub fn unexpanded(&self) -> usize {
        self.legal_move_count.saturating_sub(self.children.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Piece, PieceKind};

    fn leaf(acting: Color) -> SearchNode<()> {
        let mv = Move::new(Piece::new(acting, PieceKind::Po), Position::new(1, 1));
        SearchNode::new_child(NodeId(0), mv, (), acting, 1, 10, false, 0.0)
    }

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = SearchNode::new_root(7u8, Color::Blue, None, 3, 12, false, 0.0);

        assert!(node.parent.is_none());
        assert!(node.incoming_move.is_none());
        assert_eq!(node.to_move(), Color::Red);
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.move_number, 3);
        assert_eq!(node.unexpanded(), 12);
    }

    #[test]
    fn test_terminal_child_is_seeded() {
        let mv = Move::new(Piece::new(Color::Red, PieceKind::Bo), Position::new(0, 0));
        let node = SearchNode::new_child(NodeId(0), mv, (), Color::Red, 9, 0, true, 1000.0);
        assert!(node.is_terminal);
        assert_eq!(node.cumulative_score, 1000.0);
        assert_eq!(node.visit_count, 0);
    }

    #[test]
    fn test_mean_score() {
        let mut node = leaf(Color::Red);
        assert_eq!(node.mean_score(), 0.0);

        node.visit_count = 4;
        node.cumulative_score = -2.0;
        assert!((node.mean_score() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_uct_unvisited_is_infinite() {
        let node = leaf(Color::Red);
        assert_eq!(node.uct_value(10, Color::Red, 0.7), f64::INFINITY);
    }

    #[test]
    fn test_uct_value() {
        let mut node = leaf(Color::Red);
        node.visit_count = 4;
        node.cumulative_score = 8.0;

        let c = std::f64::consts::FRAC_1_SQRT_2;
        let explore = c * (2.0 * (16f64).ln() / 4.0).sqrt();

        // Viewer made the move: exploitation counts positively.
        let own = node.uct_value(16, Color::Red, c);
        assert!((own - (2.0 + explore)).abs() < 1e-9);

        // Opponent looking at the same node sees the negated average.
        let other = node.uct_value(16, Color::Blue, c);
        assert!((other - (-2.0 + explore)).abs() < 1e-9);
    }

    #[test]
    fn test_uct_with_unvisited_parent_is_finite() {
        let mut node = leaf(Color::Blue);
        node.visit_count = 1;
        node.cumulative_score = 3.0;
        let value = node.uct_value(0, Color::Blue, 1.0);
        assert!(value.is_finite());
        assert!((value - 3.0).abs() < 1e-9);
    }
}
