//! Round engine: the state of one player's game against the computer.
//!
//! A round is `choose -> decide -> record`. The computer's choice comes from
//! [`Opponent`], scoring from [`determine_outcome`], and [`GameState::record_round`]
//! folds the result into the histories and counters.

use std::collections::VecDeque;

use jokenpo_agent::opponent::Opponent;
use jokenpo_common::model::{
    game::{determine_outcome, Difficulty, Move, Outcome},
    record::{RoundRecord, Stats},
};
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub difficulty: Difficulty,
    move_history: Vec<Move>,
    // Most recent first
    game_history: VecDeque<RoundRecord>,
    stats: Stats,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State restored from storage. Player moves are not saved, so the pattern
    /// heuristic starts cold.
    pub fn restore(stats: Stats, game_history: VecDeque<RoundRecord>) -> Self {
        GameState {
            difficulty: Difficulty::default(),
            move_history: Vec::new(),
            game_history,
            stats,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn move_history(&self) -> &[Move] {
        &self.move_history
    }

    pub fn game_history(&self) -> &VecDeque<RoundRecord> {
        &self.game_history
    }

    pub fn recent_rounds(&self, limit: usize) -> Vec<RoundRecord> {
        self.game_history.iter().take(limit).cloned().collect()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> &'static str {
        info!("Difficulty set to {:?}", difficulty);
        self.difficulty = difficulty;
        difficulty.message()
    }

    pub fn record_round(
        &mut self,
        player_move: Move,
        opponent_move: Move,
        outcome: Outcome,
        timestamp: String,
    ) -> &RoundRecord {
        self.move_history.push(player_move);
        if !self.stats.record(outcome) {
            warn!("Stats are full at {:?}, round not counted", self.stats);
        }
        self.game_history.push_front(RoundRecord {
            player_move,
            opponent_move,
            outcome,
            timestamp,
        });
        &self.game_history[0]
    }

    /// Plays one full round with the current difficulty.
    pub fn play_round(
        &mut self,
        player_move: Move,
        opponent: &mut Opponent,
        timestamp: String,
    ) -> RoundRecord {
        let opponent_move = opponent.play(player_move, self.difficulty, &self.move_history);
        let outcome = determine_outcome(player_move, opponent_move);
        let record = self
            .record_round(player_move, opponent_move, outcome, timestamp)
            .clone();
        info!("Round {}: {}", self.stats.total, record.summary());
        record
    }

    /// Clears counters and both histories. Difficulty is kept.
    pub fn reset(&mut self) {
        self.move_history.clear();
        self.game_history.clear();
        self.stats = Stats::default();
    }
}

/// Offset of the local clock, or UTC when it cannot be determined.
///
/// On Unix this only succeeds while the process has a single thread, so call it
/// before starting the runtime.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Wall-clock time at `offset` as `HH:MM:SS`.
pub fn timestamp_now(offset: UtcOffset) -> String {
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}
