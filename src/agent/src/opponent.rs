use jokenpo_common::model::game::{Difficulty, Move};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::strategy::{PatternCounter, RandomMove, Strategy};

pub fn strategy_for(difficulty: Difficulty) -> &'static dyn Strategy {
    match difficulty {
        Difficulty::Easy => &RandomMove,
        Difficulty::Hard => &PatternCounter,
    }
}

/// Chooses the computer's move for a round.
///
/// `player_move` is the move being answered. No strategy reads it: the computer
/// only ever sees the moves of earlier rounds in `history`.
pub fn decide_opponent_move(
    _player_move: Move,
    difficulty: Difficulty,
    history: &[Move],
    rng: &mut dyn RngCore,
) -> Move {
    strategy_for(difficulty).make_move(history, rng)
}

/// The computer player, owning the randomness its strategies draw from.
pub struct Opponent {
    rng: ChaCha8Rng,
}

impl Opponent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Opponent { rng }
    }

    pub fn play(&mut self, player_move: Move, difficulty: Difficulty, history: &[Move]) -> Move {
        decide_opponent_move(player_move, difficulty, history, &mut self.rng)
    }
}

impl Default for Opponent {
    fn default() -> Self {
        Self::new(None)
    }
}
