use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    /// Result banner shown to the player after a round.
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Win => "🎉 You win! 🎉",
            Outcome::Lose => "😤 Computer wins! 😤",
            Outcome::Draw => "🤝 Draw! 🤝",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Outcome::Win => "🏆",
            Outcome::Lose => "💀",
            Outcome::Draw => "🤝",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The single move this one defeats.
    pub fn victim(&self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }

    pub fn beats(&self, other: &Move) -> bool {
        self.victim() == *other
    }

    /// The move that defeats this one.
    pub fn counter(&self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Move::Rock => "Rock 🪨",
            Move::Paper => "Paper 📄",
            Move::Scissors => "Scissors ✂️",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Confirmation shown when the player switches mode.
    pub fn message(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy mode enabled! 🟢",
            Difficulty::Hard => "Hard mode enabled! 🔴",
        }
    }
}

/// Scores a round from the player's side.
pub fn determine_outcome(player: Move, opponent: Move) -> Outcome {
    if player == opponent {
        Outcome::Draw
    } else if player.beats(&opponent) {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}
