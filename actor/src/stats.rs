//! Match statistics tracking.
//!
//! This module aggregates results across the games of one arena run:
//! - Wins per player and per color, and draws
//! - Game lengths
//! - MCTS search effort
//!
//! The final snapshot is logged and can be printed as JSON.

use engine_core::Color;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::config::PlayerKind;

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    /// Winning color, `None` for a draw
    pub winner: Option<Color>,
    pub plies: u32,
    /// Color held by player one in this game
    pub player_one_color: Color,
}

impl GameOutcome {
    /// Index (0 or 1) of the winning player, if any.
    pub fn winning_player(&self) -> Option<usize> {
        self.winner
            .map(|color| if color == self.player_one_color { 0 } else { 1 })
    }
}

/// Per-player totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub kind: PlayerKind,
    pub wins: u32,
    /// Moves chosen by search
    pub searches: u32,
    pub search_iterations: u64,
}

impl PlayerRecord {
    fn new(kind: PlayerKind) -> Self {
        Self {
            kind,
            wins: 0,
            searches: 0,
            search_iterations: 0,
        }
    }

    pub fn avg_iterations(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.search_iterations as f64 / self.searches as f64
        }
    }
}

/// Aggregated arena statistics.
#[derive(Debug)]
pub struct MatchStats {
    players: [PlayerRecord; 2],
    games: u32,
    blue_wins: u32,
    red_wins: u32,
    draws: u32,
    total_plies: u64,
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub games: u32,
    pub players: [PlayerRecord; 2],
    pub blue_wins: u32,
    pub red_wins: u32,
    pub draws: u32,
    pub avg_game_length: f64,
    pub avg_iterations_per_search: [f64; 2],
    pub runtime_seconds: f64,
}

impl MatchStats {
    pub fn new(player_one: PlayerKind, player_two: PlayerKind) -> Self {
        Self {
            players: [PlayerRecord::new(player_one), PlayerRecord::new(player_two)],
            games: 0,
            blue_wins: 0,
            red_wins: 0,
            draws: 0,
            total_plies: 0,
            start_time: Instant::now(),
        }
    }

    /// Record search effort for one move by `player`.
    pub fn record_search(&mut self, player: usize, iterations: u32) {
        let record = &mut self.players[player];
        record.searches += 1;
        record.search_iterations += iterations as u64;
    }

    /// Record a finished game.
    pub fn record_game(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.total_plies += outcome.plies as u64;

        match outcome.winner {
            Some(Color::Blue) => self.blue_wins += 1,
            Some(Color::Red) => self.red_wins += 1,
            None => self.draws += 1,
        }
        if let Some(player) = outcome.winning_player() {
            self.players[player].wins += 1;
        }
    }

    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let avg_game_length = if self.games > 0 {
            self.total_plies as f64 / self.games as f64
        } else {
            0.0
        };

        MatchStatsSnapshot {
            games: self.games,
            players: self.players.clone(),
            blue_wins: self.blue_wins,
            red_wins: self.red_wins,
            draws: self.draws,
            avg_game_length,
            avg_iterations_per_search: [
                self.players[0].avg_iterations(),
                self.players[1].avg_iterations(),
            ],
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }

    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            games = snapshot.games,
            player_one = %snapshot.players[0].kind,
            player_one_wins = snapshot.players[0].wins,
            player_two = %snapshot.players[1].kind,
            player_two_wins = snapshot.players[1].wins,
            draws = snapshot.draws,
            blue_wins = snapshot.blue_wins,
            red_wins = snapshot.red_wins,
            avg_game_length = snapshot.avg_game_length,
            runtime_seconds = snapshot.runtime_seconds,
            "Arena finished"
        );
    }
}
