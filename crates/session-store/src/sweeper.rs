use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::store::SessionStore;

/// Background task that sweeps expired sessions on a fixed interval.
///
/// Dropping the handle stops the task after its current sweep; call
/// [`Sweeper::shutdown`] to also wait for it.
#[derive(Debug)]
pub struct Sweeper {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Start the periodic sweep on the current tokio runtime.
pub fn spawn_sweeper(store: Arc<SessionStore>, interval: Duration) -> Sweeper {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = ticker.tick() => {
                    let store = Arc::clone(&store);
                    // Sweeping takes blocking locks and removes directories.
                    match tokio::task::spawn_blocking(move || store.sweep_now()).await {
                        Ok(removed) => debug!(removed, "periodic sweep finished"),
                        Err(e) => warn!(error = %e, "periodic sweep panicked"),
                    }
                }
            }
        }
        debug!("sweeper stopped");
    });

    Sweeper {
        stop: Some(stop_tx),
        task: Some(task),
    }
}

impl Sweeper {
    /// Signal the task to stop and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "sweeper task ended abnormally");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
