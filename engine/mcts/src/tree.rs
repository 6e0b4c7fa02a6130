//! Search tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Nothing is ever freed: re-rooting only moves the `root` pointer, and the
//! abandoned part of the arena stays allocated until the tree is dropped.

use crate::mask::ActionMask;
use crate::node::{NodeId, SearchNode};
use engine_core::{Color, Move};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// Search tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<S> {
    /// Arena storing all nodes
    nodes: Vec<SearchNode<S>>,

    /// Current root: the node matching the real game position
    root: NodeId,
}

impl<S> MctsTree<S> {
    /// Create a new tree holding only `root_node`.
    pub fn new(root_node: SearchNode<S>) -> Self {
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Get the current root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: SearchNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the arena, reachable or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all node IDs in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Append `child` under `parent_id` and return the new child's NodeId.
    ///
    /// The child's parent link is overwritten to point at `parent_id`.
    pub fn add_child(&mut self, parent_id: NodeId, mut child: SearchNode<S>) -> NodeId {
        debug_assert!(
            child
                .incoming_move
                .map_or(true, |mv| self.find_child(parent_id, &mv).is_none()),
            "duplicate child move under {:?}",
            parent_id
        );
        child.parent = parent_id;
        let child_id = self.allocate(child);
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Child of `parent_id` reached by `mv`, compared by move value.
    pub fn find_child(&self, parent_id: NodeId, mv: &Move) -> Option<NodeId> {
        self.get(parent_id)
            .children
            .iter()
            .copied()
            .find(|&id| self.get(id).incoming_move.as_ref() == Some(mv))
    }

    /// Moves already expanded from `parent_id`.
    pub fn child_moves(&self, parent_id: NodeId) -> Vec<Move> {
        self.get(parent_id)
            .children
            .iter()
            .filter_map(|&id| self.get(id).incoming_move)
            .collect()
    }

    /// Move the current root to `id`.
    pub fn reroot(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Replace the snapshot held by `id`, detach its children and reset its
    /// statistics.
    ///
    /// Used when the real game diverged from the snapshot, e.g. the
    /// opponent resolved a graduation differently. Detached nodes stay in
    /// the arena but are no longer reachable.
    pub fn replace_state(
        &mut self,
        id: NodeId,
        state: S,
        legal_move_count: usize,
        is_terminal: bool,
        terminal_value: f64,
    ) {
        let node = self.get_mut(id);
        node.state = state;
        node.legal_move_count = legal_move_count;
        node.is_terminal = is_terminal;
        node.terminal_value = terminal_value;
        node.visit_count = 0;
        node.cumulative_score = if is_terminal { terminal_value } else { 0.0 };
        node.graduated = None;
        node.children.clear();
    }

    /// Mark `id` as a finished position with the given value.
    pub fn mark_terminal(&mut self, id: NodeId, value: f64) {
        let node = self.get_mut(id);
        node.is_terminal = true;
        node.terminal_value = value;
    }

    /// Select the child of `node_id` with the highest UCT value.
    ///
    /// Children excluded by `mask` are skipped unless every child is
    /// excluded. Ties, including between unvisited children, are broken
    /// uniformly at random.
    pub fn select_child<R: Rng + ?Sized>(
        &self,
        node_id: NodeId,
        mask: &ActionMask,
        exploration: f64,
        rng: &mut R,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let viewer = node.to_move();
        let parent_visits = node.visit_count;

        let eligible: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|&child| !mask.excludes(node, child))
            .collect();
        let candidates = if eligible.is_empty() {
            &node.children[..]
        } else {
            &eligible[..]
        };

        pick_max(
            candidates,
            |id| self.get(id).uct_value(parent_visits, viewer, exploration),
            rng,
        )
    }

    /// Backpropagate `score` from `from` up to the arena root.
    ///
    /// `from` receives `score`, its parent `-score`, and so on, with every
    /// node on the path gaining one visit.
    pub fn backpropagate(&mut self, from: NodeId, score: f64) {
        let mut current_id = from;
        let mut current_score = score;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.cumulative_score += current_score;

            // Negate for the other player's perspective
            current_score = -current_score;

            current_id = node.parent;
        }
    }

    /// Pick the child of `node_id` to actually play.
    ///
    /// Only visited children are considered, unless none has been visited.
    /// The winner maximises total score as seen by the player to move at
    /// `node_id`, then average score, then a uniform random draw.
    pub fn best_child<R: Rng + ?Sized>(&self, node_id: NodeId, rng: &mut R) -> Option<NodeId> {
        let node = self.get(node_id);
        let viewer = node.to_move();

        let visited: Vec<NodeId> = node
            .children
            .iter()
            .copied()
            .filter(|&id| self.get(id).visit_count > 0)
            .collect();
        let candidates = if visited.is_empty() {
            &node.children[..]
        } else {
            &visited[..]
        };

        pick_max(
            candidates,
            |id| {
                let child = self.get(id);
                let sign = child.perspective_sign(viewer);
                (sign * child.cumulative_score, sign * child.mean_score())
            },
            rng,
        )
    }

    /// Get statistics about the subtree under the current root.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        let (reachable_nodes, max_depth) = self.walk(self.root, 0);
        TreeStats {
            total_nodes: self.nodes.len(),
            reachable_nodes,
            root_visits: root.visit_count,
            root_to_move: root.to_move(),
            max_depth,
        }
    }

    /// (node count, deepest level) of the subtree under `node_id`.
    fn walk(&self, node_id: NodeId, depth: u32) -> (usize, u32) {
        self.get(node_id)
            .children
            .iter()
            .fold((1, depth), |(count, deepest), &child| {
                let (n, d) = self.walk(child, depth + 1);
                (count + n, deepest.max(d))
            })
    }
}

/// Uniformly random choice among the candidates with the largest key.
fn pick_max<K, F, R>(candidates: &[NodeId], key: F, rng: &mut R) -> Option<NodeId>
where
    K: PartialOrd,
    F: Fn(NodeId) -> K,
    R: Rng + ?Sized,
{
    let mut best: Option<K> = None;
    let mut ties: Vec<NodeId> = Vec::new();

    for &id in candidates {
        let value = key(id);
        let ordering = match &best {
            None => Ordering::Greater,
            Some(current) => value.partial_cmp(current).unwrap_or(Ordering::Less),
        };
        match ordering {
            Ordering::Greater => {
                best = Some(value);
                ties.clear();
                ties.push(id);
            }
            Ordering::Equal => ties.push(id),
            Ordering::Less => {}
        }
    }

    ties.choose(rng).copied()
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    /// Nodes in the arena, including ones abandoned by re-rooting
    pub total_nodes: usize,
    /// Nodes reachable from the current root
    pub reachable_nodes: usize,
    pub root_visits: u32,
    pub root_to_move: Color,
    pub max_depth: u32,
}
