//! Periodic refresh bound to a view's lifetime

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Handle to a running auto-refresh loop
///
/// Each tick spawns the refresh future independently, so a slow request does
/// not delay the next tick. [`RefreshHandle::stop`] ends the loop; refreshes
/// already in flight run to completion and are expected to check view
/// liveness before writing.
pub struct RefreshHandle {
    name: &'static str,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Start calling `refresh` every `period`, first call one period from now
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut refresh: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!(
                "Auto-refresh '{}' started, every {} ms",
                name,
                period.as_millis()
            );

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        debug!("Auto-refresh '{}' tick", name);
                        tokio::spawn(refresh());
                    }
                }
            }

            info!("Auto-refresh '{}' stopped", name);
        });

        Self {
            name,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The loop may already have exited; nothing to do then
            let _ = tx.send(());
        }
        self.task = None;
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
