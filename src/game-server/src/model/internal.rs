use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jokenpo_common::{
    message::game_server::{
        DifficultyResponse, ErrorResponse, GameSnapshot, ResetResponse, RoundResultResponse,
    },
    model::game::{Difficulty, Move},
};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Responder<T> = oneshot::Sender<T>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error("a round is already in progress")]
    RoundInFlight,
    #[error("the game is not running")]
    Unavailable,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = match self {
            GameError::RoundInFlight => StatusCode::CONFLICT,
            GameError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// Messages
#[derive(Debug)]
pub enum GameRequest {
    Play {
        player_move: Move,
        respond_to: Responder<Result<RoundResultResponse, GameError>>,
    },
    SetDifficulty {
        difficulty: Difficulty,
        respond_to: Responder<DifficultyResponse>,
    },
    Reset {
        respond_to: Responder<ResetResponse>,
    },
    Snapshot {
        respond_to: Responder<GameSnapshot>,
    },
    // Posted by the game thread itself once the countdown is over
    CountdownFinished,
}
