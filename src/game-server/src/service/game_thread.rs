use std::sync::Arc;

use jokenpo_agent::opponent::Opponent;
use jokenpo_common::{
    message::game_server::{DifficultyResponse, GameSnapshot, ResetResponse, RoundResultResponse},
    model::{
        game::{Difficulty, Move},
        record::DISPLAY_HISTORY_LIMIT,
    },
};
use time::UtcOffset;
use tokio::sync::{
    broadcast,
    mpsc::{Receiver, Sender},
    oneshot,
};
use tracing::{debug, info, warn};

use crate::{
    engine::{timestamp_now, GameState},
    model::internal::{GameError, GameRequest, Responder},
    service::countdown::Countdown,
    store::{load_state, save_state, KeyValueStore},
};

pub const RESET_MESSAGE: &str = "Game reset! 🔄";

pub struct GameConfiguration {
    pub store: Arc<dyn KeyValueStore>,
    pub countdown: Arc<dyn Countdown>,
    pub seed: Option<u64>,
    // Timestamps in history entries
    pub utc_offset: UtcOffset,
}

enum GamePhase {
    WaitingForMove,
    CountingDown {
        player_move: Move,
        respond_to: Responder<Result<RoundResultResponse, GameError>>,
    },
}

/// Owns the one game in this process and handles its requests in arrival order.
///
/// Only one round can be counting down at a time; a move submitted meanwhile is
/// turned away rather than queued.
pub struct GameThread {
    configuration: GameConfiguration,
    state: GameState,
    opponent: Opponent,
    phase: GamePhase,
    to_self: Sender<GameRequest>,
}

impl GameThread {
    pub fn new(configuration: GameConfiguration, to_self: Sender<GameRequest>) -> Self {
        let state = load_state(configuration.store.as_ref());
        info!(
            "Loaded game with {} rounds played",
            state.stats().total
        );
        GameThread {
            opponent: Opponent::new(configuration.seed),
            configuration,
            state,
            phase: GamePhase::WaitingForMove,
            to_self,
        }
    }

    pub async fn run(
        mut self,
        shutdown_receiver: &mut broadcast::Receiver<()>,
        mut from_api: Receiver<GameRequest>,
    ) {
        info!("Initialized game thread");
        loop {
            tokio::select! {
                request = from_api.recv() => {
                    let Some(request) = request else {
                        break;
                    };
                    self.update(request);
                }
                _ = shutdown_receiver.recv() => {
                    break;
                }
            }
        }
        info!("Exiting game thread");
    }

    fn update(&mut self, request: GameRequest) {
        debug!("msg: {:?}", request);
        match request {
            GameRequest::Play {
                player_move,
                respond_to,
            } => {
                if let GamePhase::CountingDown { .. } = self.phase {
                    warn!("Got {:?} while a round is in progress", player_move);
                    reply(respond_to, Err(GameError::RoundInFlight));
                    return;
                }
                info!("Player chose {}", player_move);
                self.phase = GamePhase::CountingDown {
                    player_move,
                    respond_to,
                };
                self.start_countdown();
            }
            GameRequest::CountdownFinished => {
                let phase = std::mem::replace(&mut self.phase, GamePhase::WaitingForMove);
                let GamePhase::CountingDown {
                    player_move,
                    respond_to,
                } = phase
                else {
                    warn!("Countdown finished with no round in progress");
                    return;
                };
                let response = self.finish_round(player_move);
                reply(respond_to, Ok(response));
            }
            GameRequest::SetDifficulty {
                difficulty,
                respond_to,
            } => {
                let message = self.state.set_difficulty(difficulty);
                reply(
                    respond_to,
                    DifficultyResponse {
                        difficulty,
                        message: message.to_owned(),
                    },
                );
            }
            GameRequest::Reset { respond_to } => {
                info!("Resetting game");
                self.state.reset();
                self.persist();
                reply(
                    respond_to,
                    ResetResponse {
                        stats: self.state.stats(),
                        message: RESET_MESSAGE.to_owned(),
                    },
                );
            }
            GameRequest::Snapshot { respond_to } => {
                reply(respond_to, self.snapshot());
            }
        }
    }

    fn start_countdown(&self) {
        let countdown = self.configuration.countdown.clone();
        let to_self = self.to_self.clone();
        tokio::spawn(async move {
            countdown.run().await;
            if to_self.send(GameRequest::CountdownFinished).await.is_err() {
                debug!("Game thread gone before countdown finished");
            }
        });
    }

    // Difficulty is read here, after the countdown, not when the move was submitted.
    fn finish_round(&mut self, player_move: Move) -> RoundResultResponse {
        let record = self
            .state
            .play_round(
                player_move,
                &mut self.opponent,
                timestamp_now(self.configuration.utc_offset),
            );
        self.persist();
        RoundResultResponse {
            player_move: record.player_move,
            opponent_move: record.opponent_move,
            outcome: record.outcome,
            message: record.outcome.message().to_owned(),
            stats: self.state.stats(),
            history: self.state.recent_rounds(DISPLAY_HISTORY_LIMIT),
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            difficulty: self.state.difficulty,
            stats: self.state.stats(),
            history: self.state.recent_rounds(DISPLAY_HISTORY_LIMIT),
        }
    }

    fn persist(&self) {
        if let Err(e) = save_state(self.configuration.store.as_ref(), &self.state) {
            warn!("Failed to save game: {}", e);
        }
    }
}

fn reply<T>(respond_to: Responder<T>, response: T) {
    if respond_to.send(response).is_err() {
        debug!("Requester went away before the reply");
    }
}

/// Cloneable front door to a running [`GameThread`].
#[derive(Clone)]
pub struct GameHandle {
    sender: Sender<GameRequest>,
}

impl GameHandle {
    pub fn new(sender: Sender<GameRequest>) -> Self {
        GameHandle { sender }
    }

    pub async fn play(&self, player_move: Move) -> Result<RoundResultResponse, GameError> {
        self.request(|respond_to| GameRequest::Play {
            player_move,
            respond_to,
        })
        .await?
    }

    pub async fn set_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<DifficultyResponse, GameError> {
        self.request(|respond_to| GameRequest::SetDifficulty {
            difficulty,
            respond_to,
        })
        .await
    }

    pub async fn reset(&self) -> Result<ResetResponse, GameError> {
        self.request(|respond_to| GameRequest::Reset { respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        self.request(|respond_to| GameRequest::Snapshot { respond_to })
            .await
    }

    async fn request<T>(
        &self,
        make_request: impl FnOnce(Responder<T>) -> GameRequest,
    ) -> Result<T, GameError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make_request(respond_to))
            .await
            .map_err(|_| GameError::Unavailable)?;
        response.await.map_err(|_| GameError::Unavailable)
    }
}
