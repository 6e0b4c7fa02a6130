//! MCTS search driver.
//!
//! Every `select_move` call runs the classic loop until the time budget is
//! spent:
//! 1. Selection: descend from the current root with UCT to a frontier node
//! 2. Expansion: add one child, chosen by the solver or at random
//! 3. Simulation: oracle-guided discounted playout from the new child
//! 4. Backpropagation: alternate the score's sign up to the arena root
//!
//! The tree survives between calls. The opponent's reported move re-roots
//! it before searching, and the chosen move re-roots it again afterwards.

use std::time::{Duration, Instant};

use engine_core::{
    play_ply, terminal_reward, winner_after, Color, Heuristic, Move, OracleError, Position,
    Rules, Solver,
};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, MctsConfig};
use crate::mask::ActionMask;
use crate::node::{NodeId, SearchNode};
use crate::playout::{consult_solver, run_playout};
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("opponent move {opponent_move} is not reachable from the tracked position")]
    Desynchronized { opponent_move: Move },

    #[error("opponent move is required once the game is under way")]
    MissingOpponentMove,

    #[error("game is already decided")]
    GameOver,

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("solver proposed illegal move {mv}")]
    IllegalSolverMove { mv: Move },

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Counters for a single `select_move` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Select/expand/simulate/backpropagate rounds completed
    pub iterations: u32,
    pub playouts: u32,
    /// Solver consultations, expansion and playout combined
    pub solver_calls: u32,
    /// Solver consultations that fell back to a random move
    pub solver_fallbacks: u32,
    /// Iterations whose selection ended on an already-decided node
    pub terminal_revisits: u32,
    pub nodes_created: u32,
    /// Arena size after the call, unreachable nodes included
    pub tree_size: usize,
    pub elapsed: Duration,
}

/// Move-selection engine for one seat of one game.
///
/// Generic over the rules engine, both oracles, and the random source used
/// for every tie-break and random move.
pub struct MctsEngine<G: Rules, S, H, R> {
    rules: G,
    solver: S,
    heuristic: H,
    config: MctsConfig,
    rng: R,
    tree: Option<MctsTree<G::State>>,
    last_stats: SearchStats,
}

impl<G, S, H, R> MctsEngine<G, S, H, R>
where
    G: Rules,
    S: Solver,
    H: Heuristic,
    R: Rng,
{
    pub fn new(
        rules: G,
        solver: S,
        heuristic: H,
        config: MctsConfig,
        rng: R,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            rules,
            solver,
            heuristic,
            config,
            rng,
            tree: None,
            last_stats: SearchStats::default(),
        })
    }

    pub fn rules(&self) -> &G {
        &self.rules
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The tracked tree, if a game is in progress.
    pub fn tree(&self) -> Option<&MctsTree<G::State>> {
        self.tree.as_ref()
    }

    /// Stats of the most recent `select_move` call.
    pub fn last_stats(&self) -> &SearchStats {
        &self.last_stats
    }

    /// Forget the current game. The next `select_move` starts a fresh tree.
    pub fn new_game(&mut self) {
        self.tree = None;
    }

    /// Search from `state` for `time_budget` and return the move to play.
    ///
    /// `opponent_last_move` may be `None` only on the first call of a game.
    /// On any error the tracked tree is discarded, so the following call
    /// starts over from the state it is given.
    pub fn select_move(
        &mut self,
        state: &G::State,
        opponent_last_move: Option<Move>,
        time_budget: Duration,
    ) -> Result<Move, SearchError> {
        let started = Instant::now();
        let (mut tree, fresh) = match self.tree.take() {
            Some(tree) => (tree, false),
            None => (self.fresh_tree(state, opponent_last_move), true),
        };

        let mut stats = SearchStats::default();
        let outcome = SearchContext {
            rules: &self.rules,
            solver: &self.solver,
            heuristic: &self.heuristic,
            config: &self.config,
            rng: &mut self.rng,
            tree: &mut tree,
            stats: &mut stats,
        }
        .search(state, opponent_last_move, fresh, started, time_budget);

        stats.tree_size = tree.len();
        stats.elapsed = started.elapsed();

        match outcome {
            Ok(mv) => {
                debug!(
                    chosen = %mv,
                    iterations = stats.iterations,
                    playouts = stats.playouts,
                    solver_calls = stats.solver_calls,
                    solver_fallbacks = stats.solver_fallbacks,
                    tree_size = stats.tree_size,
                    elapsed_ms = stats.elapsed.as_millis() as u64,
                    "MCTS search complete"
                );
                self.tree = Some(tree);
                self.last_stats = stats;
                Ok(mv)
            }
            Err(err) => {
                warn!(error = %err, "MCTS search failed, discarding tree");
                self.last_stats = stats;
                Err(err)
            }
        }
    }

    /// Pick the graduation group to resolve for the engine's own move.
    ///
    /// Reuses the group chosen when the current root was built, so the real
    /// game stays on the tracked snapshot. Falls back to a uniform random
    /// choice. Returns an empty group when nothing qualifies.
    pub fn select_graduation(&mut self, state: &G::State) -> Vec<Position> {
        let groups = self.rules.graduation_groups(state);

        let recorded = self
            .tree
            .as_ref()
            .and_then(|tree| tree.get(tree.root()).graduated.as_ref())
            .filter(|group| groups.contains(group));
        if let Some(group) = recorded {
            return group.clone();
        }

        groups.choose(&mut self.rng).cloned().unwrap_or_default()
    }

    fn fresh_tree(&self, state: &G::State, incoming: Option<Move>) -> MctsTree<G::State> {
        let acting = self.rules.current_player(state).other();
        let winner = winner_after(&self.rules, state, acting);
        let legal_count = self.rules.legal_moves(state).len();
        let root = SearchNode::new_root(
            state.clone(),
            acting,
            incoming,
            self.rules.move_number(state),
            legal_count,
            winner.is_some(),
            terminal_reward(winner, acting, self.config.terminal_score),
        );
        MctsTree::new(root)
    }
}

/// Borrowed view of the engine for the duration of one search.
struct SearchContext<'a, G: Rules, S, H, R> {
    rules: &'a G,
    solver: &'a S,
    heuristic: &'a H,
    config: &'a MctsConfig,
    rng: &'a mut R,
    tree: &'a mut MctsTree<G::State>,
    stats: &'a mut SearchStats,
}

impl<G, S, H, R> SearchContext<'_, G, S, H, R>
where
    G: Rules,
    S: Solver,
    H: Heuristic,
    R: Rng,
{
    fn search(
        &mut self,
        state: &G::State,
        opponent_last_move: Option<Move>,
        fresh: bool,
        started: Instant,
        budget: Duration,
    ) -> Result<Move, SearchError> {
        if !fresh {
            self.sync_root(state, opponent_last_move)?;
        }

        let root = self.tree.root();
        if self.tree.get(root).is_terminal {
            return Err(SearchError::GameOver);
        }

        self.expand_all(root);
        if self.tree.get(root).children.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let mask = ActionMask::scan(
            self.tree,
            self.rules.board_size(),
            self.config.action_masking_time,
        );

        while started.elapsed() < budget {
            self.iterate(&mask)?;
        }

        let best = self
            .tree
            .best_child(root, self.rng)
            .ok_or(SearchError::NoLegalMoves)?;
        let mv = self
            .tree
            .get(best)
            .incoming_move
            .ok_or(SearchError::NoLegalMoves)?;
        self.tree.reroot(best);
        Ok(mv)
    }

    /// Follow the opponent's move from the current root.
    fn sync_root(
        &mut self,
        state: &G::State,
        opponent_last_move: Option<Move>,
    ) -> Result<(), SearchError> {
        let mv = opponent_last_move.ok_or(SearchError::MissingOpponentMove)?;
        let root = self.tree.root();

        let child = match self.tree.find_child(root, &mv) {
            Some(child) => child,
            None => {
                self.expand_all(root);
                self.tree
                    .find_child(root, &mv)
                    .ok_or(SearchError::Desynchronized { opponent_move: mv })?
            }
        };
        self.tree.reroot(child);

        if self.tree.get(child).state != *state {
            warn!(
                opponent_move = %mv,
                "tracked snapshot differs from the real position, resynchronising"
            );
            let acting = self.tree.get(child).acting_player;
            let winner = winner_after(self.rules, state, acting);
            let legal_count = self.rules.legal_moves(state).len();
            self.tree.replace_state(
                child,
                state.clone(),
                legal_count,
                winner.is_some(),
                terminal_reward(winner, acting, self.config.terminal_score),
            );
            self.tree.get_mut(child).move_number = self.rules.move_number(state);
        }

        Ok(())
    }

    /// One select/expand/simulate/backpropagate round.
    fn iterate(&mut self, mask: &ActionMask) -> Result<(), SearchError> {
        self.stats.iterations += 1;
        let frontier = self.select(mask);

        let node = self.tree.get(frontier);
        if node.is_terminal {
            let value = node.terminal_value;
            self.stats.terminal_revisits += 1;
            self.tree.backpropagate(frontier, value);
            return Ok(());
        }

        let state = node.state.clone();
        let legal = self.rules.legal_moves(&state);
        if legal.is_empty() {
            self.tree.mark_terminal(frontier, 0.0);
            self.tree.backpropagate(frontier, 0.0);
            return Ok(());
        }

        let Some(child) = self.expand(frontier, &state, legal)? else {
            return Ok(());
        };

        let score = if self.tree.get(child).is_terminal {
            -self.tree.get(child).terminal_value
        } else {
            self.simulate(child)?
        };
        self.tree.backpropagate(frontier, score);

        trace!(
            frontier = frontier.0,
            child = child.0,
            score = score,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Descend from the root to the node the next child hangs from.
    fn select(&mut self, mask: &ActionMask) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal || mask.is_frontier(node) {
                return current;
            }

            match self.tree.select_child(
                current,
                mask,
                self.config.exploration_constant,
                self.rng,
            ) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Add one child to `frontier`. The solver picks the move when it can,
    /// otherwise a random unexpanded legal move is used.
    fn expand(
        &mut self,
        frontier: NodeId,
        state: &G::State,
        legal: Vec<Move>,
    ) -> Result<Option<NodeId>, SearchError> {
        let expanded = self.tree.child_moves(frontier);
        let candidates: Vec<Move> = legal
            .into_iter()
            .filter(|mv| !expanded.contains(mv))
            .collect();

        self.stats.solver_calls += 1;
        let proposal = consult_solver(self.rules, self.solver, state, &expanded, &candidates)?;
        let mv = match proposal {
            Some(mv) => mv,
            None => {
                self.stats.solver_fallbacks += 1;
                match candidates.choose(self.rng) {
                    Some(&mv) => mv,
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(self.create_child(frontier, state, mv)))
    }

    /// Run a playout from `child` and record its provisional score.
    ///
    /// Returns the playout score from the frontier's point of view, which is
    /// what gets backpropagated from the frontier upwards.
    fn simulate(&mut self, child: NodeId) -> Result<f64, SearchError> {
        let node = self.tree.get(child);
        let perspective = node.to_move();
        let result = run_playout(
            self.rules,
            self.solver,
            self.heuristic,
            self.config,
            &node.state,
            perspective,
            self.rng,
        )?;

        self.stats.playouts += 1;
        self.stats.solver_calls += result.solver_calls;
        self.stats.solver_fallbacks += result.solver_fallbacks;

        self.tree.get_mut(child).cumulative_score = -result.score;
        Ok(result.score)
    }

    /// Play `mv` from `parent`'s snapshot and hang the result under it.
    fn create_child(&mut self, parent: NodeId, state: &G::State, mv: Move) -> NodeId {
        let mover: Color = self.rules.current_player(state);
        let ply = play_ply(self.rules, state, mv, self.rng);

        let is_terminal = ply.winner.is_some();
        let legal_count = if is_terminal {
            0
        } else {
            self.rules.legal_moves(&ply.state).len()
        };
        let move_number = self.rules.move_number(&ply.state);

        let mut node = SearchNode::new_child(
            parent,
            mv,
            ply.state,
            mover,
            move_number,
            legal_count,
            is_terminal,
            terminal_reward(ply.winner, mover, self.config.terminal_score),
        );
        node.graduated = ply.graduated;

        let id = self.tree.add_child(parent, node);
        self.stats.nodes_created += 1;
        trace!(node = id.0, parent = parent.0, mv = %mv, terminal = is_terminal, "expanded");
        id
    }

    /// Materialise every legal move of `node` that has no child yet.
    fn expand_all(&mut self, node: NodeId) {
        if self.tree.get(node).is_terminal {
            return;
        }

        let state = self.tree.get(node).state.clone();
        let expanded = self.tree.child_moves(node);
        for mv in self.rules.legal_moves(&state) {
            if !expanded.contains(&mv) {
                self.create_child(node, &state, mv);
            }
        }
    }
}
