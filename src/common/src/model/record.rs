use serde::{Deserialize, Serialize};

use super::game::{Move, Outcome};

/// Number of rounds a client shows in its history list.
pub const DISPLAY_HISTORY_LIMIT: usize = 10;

// Saved-game field names: player, computer, result, timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    #[serde(rename = "player")]
    pub player_move: Move,
    #[serde(rename = "computer")]
    pub opponent_move: Move,
    #[serde(rename = "result")]
    pub outcome: Outcome,
    pub timestamp: String,
}

impl RoundRecord {
    /// One history line, e.g. `🏆 Rock 🪨 vs Scissors ✂️  12:01:33`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} vs {}  {}",
            self.outcome.icon(),
            self.player_move,
            self.opponent_move,
            self.timestamp
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub total: u32,
}

impl Stats {
    /// Counts one more round. Returns false, leaving every counter as it was,
    /// when a counter is already at `u32::MAX`.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        let counter = match outcome {
            Outcome::Win => &mut self.wins,
            Outcome::Lose => &mut self.losses,
            Outcome::Draw => &mut self.draws,
        };
        let (Some(count), Some(total)) = (counter.checked_add(1), self.total.checked_add(1))
        else {
            return false;
        };
        *counter = count;
        self.total = total;
        true
    }

    /// `wins + losses + draws == total`
    pub fn is_consistent(&self) -> bool {
        u64::from(self.wins) + u64::from(self.losses) + u64::from(self.draws)
            == u64::from(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_counters_consistent() {
        let mut stats = Stats::default();
        for outcome in [Outcome::Win, Outcome::Draw, Outcome::Lose, Outcome::Win] {
            assert!(stats.record(outcome));
            assert!(stats.is_consistent());
        }
        assert_eq!(
            stats,
            Stats {
                wins: 2,
                losses: 1,
                draws: 1,
                total: 4
            }
        );
    }

    #[test]
    fn full_counters_stop_counting() {
        let mut stats = Stats {
            wins: u32::MAX,
            losses: 0,
            draws: 0,
            total: u32::MAX,
        };
        let before = stats;
        assert!(!stats.record(Outcome::Win));
        assert!(!stats.record(Outcome::Draw));
        assert_eq!(stats, before);

        let mut stats = Stats {
            wins: 0,
            losses: 1,
            draws: u32::MAX - 1,
            total: u32::MAX,
        };
        assert!(!stats.record(Outcome::Lose));
        assert!(stats.is_consistent());
    }

    #[test]
    fn inconsistent_counters_detected() {
        let stats = Stats {
            wins: 1,
            losses: 0,
            draws: 0,
            total: 3,
        };
        assert!(!stats.is_consistent());
        assert!(Stats::default().is_consistent());
    }

    #[test]
    fn record_uses_saved_game_field_names() {
        let text = r#"{"player":"rock","computer":"scissors","result":"win","timestamp":"10:00:00"}"#;
        let record: RoundRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.player_move, Move::Rock);
        assert_eq!(record.opponent_move, Move::Scissors);
        assert_eq!(record.outcome, Outcome::Win);
        assert_eq!(record.summary(), "🏆 Rock 🪨 vs Scissors ✂️  10:00:00");
    }
}
