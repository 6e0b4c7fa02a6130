//! Tests for the configuration module.

use super::*;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, None);
    assert_eq!(config.mcts.first_n_strategy, 21);
    assert_eq!(config.mcts.playout_depth, 21);
    assert_eq!(config.mcts.action_masking_time, 6);
    assert_eq!(config.mcts.time_budget_ms, 1000);
    assert_eq!(config.arena.games, 2);
    assert_eq!(config.arena.max_plies, 200);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"
seed = 99

[mcts]
playout_depth = 10
discount_score = 0.5
time_budget_ms = 200

[arena]
games = 10
red = "mcts"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.common.seed, Some(99));
    assert_eq!(config.mcts.playout_depth, 10);
    assert!((config.mcts.discount_score - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.mcts.time_budget_ms, 200);
    assert_eq!(config.arena.games, 10);
    assert_eq!(config.arena.red, "mcts");
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
first_n_strategy = 3
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.first_n_strategy, 3);
    assert_eq!(config.mcts.playout_depth, 21); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.arena.board_size, 6); // Default
}

#[test]
fn test_env_overrides() {
    std::env::set_var("POBO_MCTS_PLAYOUT_DEPTH", "5");
    std::env::set_var("POBO_ARENA_BLUE", "random");
    std::env::set_var("POBO_COMMON_SEED", "1234");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.playout_depth, 5);
    assert_eq!(config.arena.blue, "random");
    assert_eq!(config.common.seed, Some(1234));

    std::env::remove_var("POBO_MCTS_PLAYOUT_DEPTH");
    std::env::remove_var("POBO_ARENA_BLUE");
    std::env::remove_var("POBO_COMMON_SEED");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("POBO_MCTS_DISCOUNT_SCORE", "not-a-number");

    let config = apply_env_overrides(CentralConfig::default());
    assert!((config.mcts.discount_score - 0.9).abs() < f64::EPSILON);

    std::env::remove_var("POBO_MCTS_DISCOUNT_SCORE");
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let config = load_from_path(std::path::Path::new("/nonexistent/pobo/config.toml"));
    assert_eq!(config.arena.pool_size, 8);
}

#[test]
fn test_load_from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("pobo-config-{}.toml", std::process::id()));
    std::fs::write(&path, "[arena]\nmax_plies = 42\n").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.arena.max_plies, 42);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.log_level, cloned.common.log_level);
    assert_eq!(config.arena.blue, cloned.arena.blue);
}
