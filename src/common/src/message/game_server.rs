use crate::model::{
    game::{Difficulty, Move, Outcome},
    record::{RoundRecord, Stats},
};
use serde::{Deserialize, Serialize};

// Client types
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayRoundRequest {
    pub player_move: Move,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SetDifficultyRequest {
    pub difficulty: Difficulty,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoundResultResponse {
    pub player_move: Move,
    pub opponent_move: Move,
    pub outcome: Outcome,
    pub message: String,
    pub stats: Stats,
    pub history: Vec<RoundRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DifficultyResponse {
    pub difficulty: Difficulty,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResetResponse {
    pub stats: Stats,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub difficulty: Difficulty,
    pub stats: Stats,
    pub history: Vec<RoundRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
