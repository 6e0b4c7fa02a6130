//! End-to-end search scenarios on the Lineup fixture game.

use std::cell::Cell;
use std::time::Duration;

use engine_core::{
    BoardEncoding, Color, ForbiddenMove, Move, NeutralHeuristic, NoSolver, Piece, PieceKind,
    Position, Rules, SolverReply,
};
use games_lineup::{GreedySolver, Lineup, LineupState, MaterialHeuristic};
use mcts::{run_playout, MctsConfig, MctsEngine, MctsTree, SearchError, SearchNode};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const BUDGET: Duration = Duration::from_millis(25);

fn greedy_engine(seed: u64) -> MctsEngine<Lineup, GreedySolver, MaterialHeuristic, ChaCha20Rng> {
    MctsEngine::new(
        Lineup::default(),
        GreedySolver::default(),
        MaterialHeuristic::default(),
        MctsConfig::for_testing(),
        ChaCha20Rng::seed_from_u64(seed),
    )
    .unwrap()
}

/// Play `mv` in the real game, letting `graduation` pick the group.
fn commit(
    rules: &Lineup,
    state: &LineupState,
    mv: Move,
    graduation: impl FnOnce(&LineupState) -> Vec<Position>,
) -> (LineupState, Option<Color>) {
    let mover = rules.current_player(state);
    let mut next = rules.apply(state, mv);
    let group = graduation(&next);
    if !group.is_empty() {
        next = rules.graduate(&next, &group);
    }
    let winner = engine_core::winner_after(rules, &next, mover);
    (rules.advance_turn(&next), winner)
}

#[test]
fn total_score_decides_over_average() {
    // X: 3 visits, +30 total. Y: 1 visit, +5 total. Both moved into by the
    // player to move at the root.
    for seed in 0..20 {
        let mut tree = MctsTree::new(SearchNode::new_root((), Color::Blue, None, 10, 2, false, 0.0));
        let root = tree.root();
        let mut add = |x: u8, visits: u32, score: f64| {
            let mv = Move::new(Piece::new(Color::Red, PieceKind::Po), Position::new(x, 2));
            let id = tree.add_child(
                root,
                SearchNode::new_child(root, mv, (), Color::Red, 11, 34, false, 0.0),
            );
            let node = tree.get_mut(id);
            node.visit_count = visits;
            node.cumulative_score = score;
            id
        };
        let x = add(1, 3, 30.0);
        let _y = add(2, 1, 5.0);

        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        assert_eq!(tree.best_child(root, &mut rng), Some(x));
    }
}

#[test]
fn solver_without_answers_falls_back_to_random() {
    let calls = Cell::new(0u32);
    let silent = |_: &BoardEncoding, _: &[ForbiddenMove]| {
        calls.set(calls.get() + 1);
        SolverReply::NoSolution
    };

    let rules = Lineup::default();
    let state = rules.initial_state(Color::Blue);
    let mut engine = MctsEngine::new(
        rules,
        silent,
        MaterialHeuristic::default(),
        MctsConfig::for_testing(),
        ChaCha20Rng::seed_from_u64(11),
    )
    .unwrap();

    let mv = engine.select_move(&state, None, BUDGET).unwrap();
    assert!(engine.rules().legal_moves(&state).contains(&mv));

    let stats = engine.last_stats().clone();
    assert!(stats.iterations > 0);
    assert!(stats.solver_calls > 0);
    assert_eq!(stats.solver_fallbacks, stats.solver_calls);
    assert_eq!(stats.solver_calls, calls.get());
    assert!(stats.elapsed >= BUDGET);
}

#[test]
fn ply_cap_adds_no_terminal_bonus() {
    let rules = Lineup::default();
    let state = rules.initial_state(Color::Red);
    let config = MctsConfig::default().with_playout_depth(4);
    let flat = |_: &BoardEncoding, _: Color| 1.0;
    let mut rng = ChaCha20Rng::seed_from_u64(5);

    let result = run_playout(&rules, &NoSolver, &flat, &config, &state, Color::Blue, &mut rng)
        .unwrap();

    assert_eq!(result.plies, 4);
    assert!(result.winner.is_none());
    let expected = 1.0 + 0.9 + 0.81 + 0.729;
    assert!((result.score - expected).abs() < 1e-9, "{}", result.score);
}

#[test]
fn unexplored_reply_is_found_after_reroot() {
    let rules = Lineup::default();
    let mut engine = greedy_engine(21);
    let state = rules.initial_state(Color::Red);

    let ours = engine.select_move(&state, None, BUDGET).unwrap();
    let (state, _) = commit(&rules, &state, ours, |s| engine.select_graduation(s));

    // Pick a reply the search never expanded, if there is one.
    let tree = engine.tree().unwrap();
    let expanded = tree.child_moves(tree.root());
    let legal = rules.legal_moves(&state);
    let reply = legal
        .iter()
        .copied()
        .find(|mv| !expanded.contains(mv))
        .unwrap_or(legal[0]);

    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let (state, _) = commit(&rules, &state, reply, |s| {
        engine_core::random_graduation(&rules, s, &mut rng).unwrap_or_default()
    });

    let next = engine.select_move(&state, Some(reply), BUDGET).unwrap();
    assert!(rules.legal_moves(&state).contains(&next));
}

#[test]
fn unknown_opponent_move_is_a_desync() {
    let rules = Lineup::default();
    let mut engine = greedy_engine(31);
    let state = rules.initial_state(Color::Red);
    let ours = engine.select_move(&state, None, BUDGET).unwrap();
    let (state, _) = commit(&rules, &state, ours, |s| engine.select_graduation(s));

    // Blue has no Bo in the opening, so this can never be a child.
    let bogus = Move::new(Piece::new(Color::Blue, PieceKind::Bo), Position::new(2, 2));
    let err = engine.select_move(&state, Some(bogus), BUDGET).unwrap_err();
    match err {
        SearchError::Desynchronized { opponent_move } => assert_eq!(opponent_move, bogus),
        other => panic!("unexpected error: {other}"),
    }

    // The tree is gone; the engine can pick the game up from scratch.
    assert!(engine.tree().is_none());
    assert!(engine.select_move(&state, None, BUDGET).is_ok());
}

#[test]
fn drifted_position_replaces_the_tracked_snapshot() {
    let rules = Lineup::default();
    let mut engine = greedy_engine(61);
    let state = rules.initial_state(Color::Red);
    let ours = engine.select_move(&state, None, BUDGET).unwrap();
    let (state, _) = commit(&rules, &state, ours, |s| engine.select_graduation(s));

    let reply = rules.legal_moves(&state)[0];
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let (state, _) = commit(&rules, &state, reply, |s| {
        engine_core::random_graduation(&rules, s, &mut rng).unwrap_or_default()
    });

    // The real board holds a Red piece the engine never placed.
    let size = rules.board_size();
    let spare = (0..size)
        .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
        .find(|&pos| state.cell(pos).is_none())
        .unwrap();
    let drift = state.with_piece(spare, Piece::new(Color::Red, PieceKind::Po));

    let arena_before = engine.tree().unwrap().len();
    let mv = engine.select_move(&drift, Some(reply), BUDGET).unwrap();
    assert!(rules.legal_moves(&drift).contains(&mv));

    // The chosen child hangs from the resynchronised node.
    let tree = engine.tree().unwrap();
    let synced = tree.get(tree.get(tree.root()).parent);
    assert_eq!(synced.incoming_move, Some(reply));
    assert_eq!(synced.state, drift);
    assert_eq!(synced.children.len(), rules.legal_moves(&drift).len());
    assert!(synced.children.iter().all(|id| id.index() >= arena_before));
}

#[test]
fn engines_play_each_other() {
    let rules = Lineup::default();
    let mut red = greedy_engine(41);
    let mut blue = MctsEngine::new(
        rules,
        NoSolver,
        NeutralHeuristic,
        MctsConfig::for_testing(),
        ChaCha20Rng::seed_from_u64(42),
    )
    .unwrap();

    let mut state = rules.initial_state(Color::Red);
    let mut last: Option<Move> = None;

    for _ in 0..12 {
        let mover = rules.current_player(&state);
        let mv = match mover {
            Color::Red => red.select_move(&state, last, BUDGET).unwrap(),
            Color::Blue => blue.select_move(&state, last, BUDGET).unwrap(),
        };
        assert_eq!(mv.piece.color, mover);
        assert!(rules.legal_moves(&state).contains(&mv));

        let (next, winner) = commit(&rules, &state, mv, |s| match mover {
            Color::Red => red.select_graduation(s),
            Color::Blue => blue.select_graduation(s),
        });
        state = next;
        last = Some(mv);
        if winner.is_some() {
            break;
        }
    }
}

#[test]
fn bad_solver_reply_surfaces_as_error() {
    let rules = Lineup::default();
    let state = rules.initial_state(Color::Red);
    let off_board = |_: &BoardEncoding, _: &[ForbiddenMove]| SolverReply::Placement {
        piece: 1,
        row: 9,
        column: 0,
        cost: 0,
    };
    let mut engine = MctsEngine::new(
        rules,
        off_board,
        NeutralHeuristic,
        MctsConfig::for_testing(),
        ChaCha20Rng::seed_from_u64(51),
    )
    .unwrap();

    let err = engine.select_move(&state, None, BUDGET).unwrap_err();
    assert!(matches!(err, SearchError::Oracle(_)));
    assert!(engine.tree().is_none());
}
