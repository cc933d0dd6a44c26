use std::time::Duration;

use clap::Parser;
use jokenpo_common::utility::create_shutdown_channel;
use jokenpo_server::{
    engine::local_offset,
    entrypoint::{serve, GameServerConfig},
};
use tracing::{info, Level};

/// Rock-paper-scissors against the computer, over HTTP.
#[derive(Parser, Debug)]
#[command(name = "jokenpo-server", version)]
struct Args {
    /// Address the HTTP API binds to
    #[arg(long, default_value = "0.0.0.0:8080")]
    address: String,

    /// SQLite file for stats and history; kept in memory when omitted
    #[arg(long)]
    db_path: Option<String>,

    /// Length of each countdown step in milliseconds, 0 to skip it
    #[arg(long, default_value_t = 1000)]
    countdown_ms: u64,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for GameServerConfig {
    fn from(args: Args) -> Self {
        GameServerConfig {
            address: args.address,
            db_path: args.db_path,
            countdown_step: Duration::from_millis(args.countdown_ms),
            seed: args.seed,
            utc_offset: local_offset(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(Level::DEBUG)
        .init();
    // Built before the runtime: the local offset is only readable single-threaded
    let config = GameServerConfig::from(Args::parse());
    info!("Starting with {:?}", config);
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to start tokio runtime")
        .block_on(async {
            let (_shutdown_sender, shutdown_receiver) = create_shutdown_channel();
            serve(config, shutdown_receiver, None).await;
        });
}
