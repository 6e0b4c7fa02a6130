//! Arena: plays a series of games between two players

use anyhow::Result;
use engine_core::{winner_after, Color, Move, Rules};
use games_lineup::Lineup;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::player::{build_player, Player};
use crate::stats::{GameOutcome, MatchStats};

/// Color that opens every game.
const FIRST_TO_MOVE: Color = Color::Blue;

pub struct Arena {
    rules: Lineup,
    /// Player one holds Blue in even games, Red in odd ones
    players: [Box<dyn Player>; 2],
    max_plies: u32,
    stats: MatchStats,
}

impl Arena {
    pub fn new(config: &Config) -> Result<Self> {
        let rules = Lineup::new(config.board_size, config.pool_size);
        let search = config.mcts_config();
        let one = config.blue_kind()?;
        let two = config.red_kind()?;

        let players = [
            build_player(one, rules, &search, config.seed)?,
            build_player(two, rules, &search, config.seed.map(|s| s.wrapping_add(1)))?,
        ];

        Ok(Self {
            rules,
            players,
            max_plies: config.max_plies,
            stats: MatchStats::new(one, two),
        })
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    /// Play `games` games, swapping colors after each one.
    pub fn run(&mut self, games: u32) -> Result<&MatchStats> {
        for game in 0..games {
            let started = Instant::now();
            let outcome = self.play_game(game)?;
            self.stats.record_game(&outcome);

            info!(
                game = game + 1,
                of = games,
                winner = ?outcome.winner,
                plies = outcome.plies,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Game finished"
            );
        }
        Ok(&self.stats)
    }

    /// Play one game to a win or the ply cap.
    pub fn play_game(&mut self, game: u32) -> Result<GameOutcome> {
        let player_one_color = if game % 2 == 0 {
            Color::Blue
        } else {
            Color::Red
        };
        let seat = |color: Color| usize::from(color != player_one_color);

        for player in self.players.iter_mut() {
            player.new_game();
        }

        let mut state = self.rules.initial_state(FIRST_TO_MOVE);
        let mut last: Option<Move> = None;
        let mut plies = 0;

        while plies < self.max_plies {
            if self.rules.legal_moves(&state).is_empty() {
                debug!(plies, "no legal moves, scoring as a draw");
                break;
            }

            let mover = self.rules.current_player(&state);
            let index = seat(mover);
            let player = &mut self.players[index];

            let mv = player.select_move(&state, last)?;
            if let Some(iterations) = player.last_iterations() {
                self.stats.record_search(index, iterations);
            }

            let mut next = self.rules.apply(&state, mv);
            let group = player.select_graduation(&next);
            if !group.is_empty() {
                next = self.rules.graduate(&next, &group);
            }
            let winner = winner_after(&self.rules, &next, mover);

            state = self.rules.advance_turn(&next);
            last = Some(mv);
            plies += 1;
            debug!(ply = plies, %mv, graduated = group.len(), "move played");

            if winner.is_some() {
                return Ok(GameOutcome {
                    winner,
                    plies,
                    player_one_color,
                });
            }
        }

        Ok(GameOutcome {
            winner: None,
            plies,
            player_one_color,
        })
    }
}
