use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

pub const COUNTDOWN_LABELS: [&str; 4] = ["3", "2", "1", "GO!"];

/// Pause between a move being submitted and the result being revealed.
#[async_trait]
pub trait Countdown: Send + Sync + 'static {
    async fn run(&self);
}

/// Sleeps `step` once per label, in order.
pub struct TimedCountdown {
    step: Duration,
}

impl TimedCountdown {
    pub fn new(step: Duration) -> Self {
        TimedCountdown { step }
    }
}

#[async_trait]
impl Countdown for TimedCountdown {
    async fn run(&self) {
        for label in COUNTDOWN_LABELS {
            debug!("Countdown: {}", label);
            tokio::time::sleep(self.step).await;
        }
    }
}

pub struct Immediate;

#[async_trait]
impl Countdown for Immediate {
    async fn run(&self) {}
}
