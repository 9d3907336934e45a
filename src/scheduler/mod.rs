//! Session cleanup scheduler
//! Expired sessions are already ignored on lookup; this only keeps the table small.
// region:    --- Imports
use crate::store::SharedStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Session Sweeper
pub struct SessionSweeper {
    store: SharedStore,
    period: Duration,
}

impl SessionSweeper {
    pub fn new(store: SharedStore, period: Duration) -> Self {
        Self { store, period }
    }

    /// Spawns the sweep loop. The first sweep runs immediately.
    pub fn start(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                match store.delete_expired_sessions().await {
                    Ok(removed) => debug!(
                        "{:<12} --> Removed {} expired sessions",
                        "Scheduler", removed
                    ),
                    Err(e) => error!(
                        "{:<12} --> Session cleanup failed: {:?}",
                        "Scheduler", e
                    ),
                }
            }
        })
    }
}
// endregion: --- Session Sweeper
