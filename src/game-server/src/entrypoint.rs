use std::{sync::Arc, time::Duration};

use jokenpo_common::utility::random_address;
use time::UtcOffset;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};

use crate::{
    model::internal::GameRequest,
    service::{
        countdown::{Countdown, Immediate, TimedCountdown},
        game_api::GameApi,
        game_thread::{GameConfiguration, GameHandle, GameThread},
    },
    store::{KeyValueStore, MemoryStore, SqliteStore},
};

#[derive(Clone, Debug)]
pub struct GameServerConfig {
    pub address: String,
    // None keeps everything in memory
    pub db_path: Option<String>,
    pub countdown_step: Duration,
    pub seed: Option<u64>,
    pub utc_offset: UtcOffset,
}

impl Default for GameServerConfig {
    fn default() -> Self {
        GameServerConfig {
            address: "0.0.0.0:8080".to_owned(),
            db_path: None,
            countdown_step: Duration::from_secs(1),
            seed: None,
            utc_offset: UtcOffset::UTC,
        }
    }
}

impl GameServerConfig {
    fn store(&self) -> Arc<dyn KeyValueStore> {
        match &self.db_path {
            Some(db_path) => match SqliteStore::open(db_path.clone()) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    warn!(
                        "Could not open {}: {}; keeping the game in memory",
                        db_path, e
                    );
                    Arc::new(MemoryStore::new())
                }
            },
            None => Arc::new(MemoryStore::new()),
        }
    }

    fn countdown(&self) -> Arc<dyn Countdown> {
        if self.countdown_step.is_zero() {
            Arc::new(Immediate)
        } else {
            Arc::new(TimedCountdown::new(self.countdown_step))
        }
    }
}

pub async fn serve(
    config: GameServerConfig,
    shutdown_receiver: broadcast::Receiver<()>,
    ready_signal: Option<tokio::sync::oneshot::Sender<()>>,
) {
    let mut game_shutdown_receiver = shutdown_receiver.resubscribe();
    let api_shutdown_receiver = shutdown_receiver.resubscribe();
    let (to_game_sender, to_game_receiver): (
        mpsc::Sender<GameRequest>,
        mpsc::Receiver<GameRequest>,
    ) = mpsc::channel(100);

    // One thread owns the game; the API only talks to it through the channel
    let game_thread = GameThread::new(
        GameConfiguration {
            store: config.store(),
            countdown: config.countdown(),
            seed: config.seed,
            utc_offset: config.utc_offset,
        },
        to_game_sender.clone(),
    );
    let game_handle: JoinHandle<()> = tokio::spawn(async move {
        game_thread
            .run(&mut game_shutdown_receiver, to_game_receiver)
            .await
    });

    // Bind before signalling ready so clients can connect right away
    let listener = TcpListener::bind(config.address.clone())
        .await
        .unwrap_or_else(|e| {
            panic!("Failed to bind to {}: {}", config.address, e);
        });
    info!("Game API listening on {}", config.address);
    let game = GameHandle::new(to_game_sender);
    let api_handle: JoinHandle<()> =
        tokio::spawn(GameApi::listen(listener, api_shutdown_receiver, game));

    // Signal that the server is ready
    if let Some(ready_signal) = ready_signal {
        info!("Sent ready");
        ready_signal.send(()).expect("Failed to send ready signal");
    }

    api_handle.await.expect("Game API exited non-gracefully");
    game_handle.await.expect("Game thread exited non-gracefully");
}

/// In-process server on a random port, for tests.
pub struct GameServer {
    pub config: GameServerConfig,
    shutdown_sender: broadcast::Sender<()>,
}

impl GameServer {
    pub async fn new(config: GameServerConfig) -> Self {
        // Init logging, ignore error if already set
        let _ = tracing_subscriber::fmt()
            .with_line_number(true)
            .with_file(true)
            .with_max_level(Level::DEBUG)
            .try_init();

        let (shutdown_sender, shutdown_receiver) = broadcast::channel(1);
        let (ready_sender, ready_receiver) = tokio::sync::oneshot::channel();
        tokio::spawn(serve(config.clone(), shutdown_receiver, Some(ready_sender)));

        // Wait for server to be ready
        ready_receiver.await.expect("Server failed to start");

        GameServer {
            config,
            shutdown_sender,
        }
    }

    /// Random port, no countdown delay, in-memory store.
    pub async fn for_tests(seed: u64) -> Self {
        Self::new(GameServerConfig {
            address: random_address().await,
            db_path: None,
            countdown_step: Duration::ZERO,
            seed: Some(seed),
            utc_offset: UtcOffset::UTC,
        })
        .await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.config.address)
    }

    pub async fn shutdown(&self) {
        self.shutdown_sender.send(()).expect("Failed to shutdown");
    }
}
