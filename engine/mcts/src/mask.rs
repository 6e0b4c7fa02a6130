//! Opening action mask.
//!
//! For the first few plies of the real game, placements on the outer ring
//! of the board are kept out of UCT selection. The mask is rebuilt once per
//! `select_move` from every node currently in the arena.

use crate::node::{NodeId, SearchNode};
use crate::tree::MctsTree;
use std::collections::HashSet;

/// Set of border-move nodes plus the ply horizon the mask applies to.
#[derive(Debug, Clone, Default)]
pub struct ActionMask {
    masked: HashSet<NodeId>,
    horizon: u32,
}

impl ActionMask {
    /// A mask that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect every node whose incoming move lands on the border ring.
    pub fn scan<S>(tree: &MctsTree<S>, board_size: u8, horizon: u32) -> Self {
        let masked = tree
            .ids()
            .filter(|&id| {
                tree.get(id)
                    .incoming_move
                    .is_some_and(|mv| mv.to.is_on_border(board_size))
            })
            .collect();
        Self { masked, horizon }
    }

    #[inline]
    pub fn is_masked(&self, id: NodeId) -> bool {
        self.masked.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.masked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masked.is_empty()
    }

    /// Whether `parent` is still inside the opening window.
    #[inline]
    pub fn active_at<S>(&self, parent: &SearchNode<S>) -> bool {
        parent.move_number < self.horizon
    }

    /// Whether `child` is kept out of selection at `parent`.
    #[inline]
    pub fn excludes<S>(&self, parent: &SearchNode<S>, child: NodeId) -> bool {
        self.active_at(parent) && self.is_masked(child)
    }

    /// Number of legal moves at `node` that need not be expanded before it
    /// stops being a frontier.
    #[inline]
    pub fn allowance<S>(&self, node: &SearchNode<S>) -> usize {
        if self.active_at(node) {
            self.horizon as usize
        } else {
            0
        }
    }

    /// Whether `node` still has room for a new child.
    #[inline]
    pub fn is_frontier<S>(&self, node: &SearchNode<S>) -> bool {
        node.unexpanded() > self.allowance(node)
    }
}
