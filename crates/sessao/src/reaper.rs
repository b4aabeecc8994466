// Idle session reaper

use crate::store::SessionStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Default time between sweeps (1 hour)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default idle time after which a session is dropped (4 hours)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Reaper timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaperConfig {
    /// Time between sweeps
    pub sweep_interval: Duration,

    /// Idle time after which a session expires
    pub ttl: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Spawn a background task that periodically expires idle sessions.
///
/// The first sweep happens one interval after spawning. Abort the returned
/// handle to stop the task.
pub fn spawn_reaper(store: SessionStore, config: ReaperConfig) -> JoinHandle<()> {
    info!(
        "Session reaper started: sweep every {:?}, ttl {:?}",
        config.sweep_interval, config.ttl
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval() fires immediately on the first tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let expired = store.expire_older_than(config.ttl).await;
            debug!("Reaper sweep: {} expired, {} remaining", expired, store.len().await);
        }
    })
}
