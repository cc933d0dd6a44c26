use jokenpo_common::model::game::Move;
use rand::{Rng, RngCore};
use tracing::debug;

/// Picks the computer's next move from the player's past moves.
pub trait Strategy {
    fn make_move(&self, history: &[Move], rng: &mut dyn RngCore) -> Move;
}

pub fn random_move(rng: &mut dyn RngCore) -> Move {
    Move::ALL[rng.gen_range(0..Move::ALL.len())]
}

// Random
pub struct RandomMove;
impl Strategy for RandomMove {
    fn make_move(&self, _: &[Move], rng: &mut dyn RngCore) -> Move {
        random_move(rng)
    }
}

/// Guesses the player's next move from their last two and plays its counter.
pub struct PatternCounter;

impl PatternCounter {
    /// Predicted next player move, keyed on the last two moves in the order played.
    ///
    /// Only repeats and forward cycles (rock -> paper -> scissors -> rock) are listed.
    /// The three backward pairs have no prediction.
    pub fn predict(history: &[Move]) -> Option<Move> {
        let [.., previous, last] = history else {
            return None;
        };
        match (previous, last) {
            (Move::Rock, Move::Rock) => Some(Move::Paper),
            (Move::Paper, Move::Paper) => Some(Move::Scissors),
            (Move::Scissors, Move::Scissors) => Some(Move::Rock),
            (Move::Rock, Move::Paper) => Some(Move::Scissors),
            (Move::Paper, Move::Scissors) => Some(Move::Rock),
            (Move::Scissors, Move::Rock) => Some(Move::Paper),
            _ => None,
        }
    }
}

impl Strategy for PatternCounter {
    fn make_move(&self, history: &[Move], rng: &mut dyn RngCore) -> Move {
        match Self::predict(history) {
            Some(predicted) => {
                debug!("Predicted player move {:?}, countering", predicted);
                predicted.counter()
            }
            None => random_move(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const LISTED: [((Move, Move), Move); 6] = [
        ((Move::Rock, Move::Rock), Move::Paper),
        ((Move::Paper, Move::Paper), Move::Scissors),
        ((Move::Scissors, Move::Scissors), Move::Rock),
        ((Move::Rock, Move::Paper), Move::Scissors),
        ((Move::Paper, Move::Scissors), Move::Rock),
        ((Move::Scissors, Move::Rock), Move::Paper),
    ];

    #[test]
    fn predicts_every_listed_pair() {
        for ((previous, last), predicted) in LISTED {
            assert_eq!(PatternCounter::predict(&[previous, last]), Some(predicted));
        }
    }

    #[test]
    fn backward_pairs_have_no_prediction() {
        for pair in [
            [Move::Rock, Move::Scissors],
            [Move::Paper, Move::Rock],
            [Move::Scissors, Move::Paper],
        ] {
            assert_eq!(PatternCounter::predict(&pair), None);
        }
    }

    #[test]
    fn short_history_has_no_prediction() {
        assert_eq!(PatternCounter::predict(&[]), None);
        assert_eq!(PatternCounter::predict(&[Move::Rock]), None);
    }

    #[test]
    fn only_last_two_moves_count() {
        let history = [Move::Paper, Move::Scissors, Move::Scissors, Move::Rock, Move::Rock];
        assert_eq!(PatternCounter::predict(&history), Some(Move::Paper));
    }

    #[test]
    fn plays_counter_of_prediction() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for ((previous, last), predicted) in LISTED {
            let played = PatternCounter.make_move(&[previous, last], &mut rng);
            assert_eq!(played, predicted.counter());
            assert!(played.beats(&predicted));
        }
    }

    #[test]
    fn random_move_covers_all_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let seen: Vec<Move> = (0..100).map(|_| RandomMove.make_move(&[], &mut rng)).collect();
        for m in Move::ALL {
            assert!(seen.contains(&m));
        }
    }
}
