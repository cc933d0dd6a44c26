use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use jokenpo_common::{
    message::game_server::{
        DifficultyResponse, GameSnapshot, PlayRoundRequest, ResetResponse, RoundResultResponse,
        SetDifficultyRequest,
    },
    model::record::{RoundRecord, Stats},
};
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{model::internal::GameError, service::game_thread::GameHandle};

pub struct GameApi {}

impl GameApi {
    pub fn router(game: GameHandle) -> Router {
        Router::new()
            .route("/", get(Self::root))
            .route("/round", post(Self::play_round))
            .route("/difficulty", put(Self::set_difficulty))
            .route("/reset", post(Self::reset))
            .route("/stats", get(Self::stats))
            .route("/history", get(Self::history))
            .route("/state", get(Self::state))
            .layer(TraceLayer::new_for_http())
            .with_state(game)
    }

    pub async fn listen(
        listener: TcpListener,
        mut shutdown_receiver: broadcast::Receiver<()>,
        game: GameHandle,
    ) {
        axum::serve(listener, Self::router(game))
            .with_graceful_shutdown(async move {
                // A closed channel means the sender is gone; stop either way
                let _ = shutdown_receiver.recv().await;
            })
            .await
            .expect("Game API exited with an error");
        info!("Exited game API");
    }

    async fn root() -> &'static str {
        "Jokenpo server"
    }

    async fn play_round(
        State(game): State<GameHandle>,
        Json(request): Json<PlayRoundRequest>,
    ) -> Result<Json<RoundResultResponse>, GameError> {
        Ok(Json(game.play(request.player_move).await?))
    }

    async fn set_difficulty(
        State(game): State<GameHandle>,
        Json(request): Json<SetDifficultyRequest>,
    ) -> Result<Json<DifficultyResponse>, GameError> {
        Ok(Json(game.set_difficulty(request.difficulty).await?))
    }

    async fn reset(State(game): State<GameHandle>) -> Result<Json<ResetResponse>, GameError> {
        Ok(Json(game.reset().await?))
    }

    async fn stats(State(game): State<GameHandle>) -> Result<Json<Stats>, GameError> {
        Ok(Json(game.snapshot().await?.stats))
    }

    async fn history(
        State(game): State<GameHandle>,
    ) -> Result<Json<Vec<RoundRecord>>, GameError> {
        Ok(Json(game.snapshot().await?.history))
    }

    async fn state(State(game): State<GameHandle>) -> Result<Json<GameSnapshot>, GameError> {
        Ok(Json(game.snapshot().await?))
    }
}
