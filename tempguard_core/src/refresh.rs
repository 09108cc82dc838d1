//! Supervised periodic refresh
//!
//! Each detector gets a background task that refreshes immediately, then
//! once per interval, until the supervisor signals shutdown through a watch
//! channel.

use crate::list::RefreshOutcome;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Something with a refresh cycle
#[async_trait]
pub trait Refreshable: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    async fn refresh(&self) -> RefreshOutcome;
}

/// Start a task that refreshes `target` now and then every `interval`
pub fn spawn_refresh<T: Refreshable>(
    target: Arc<T>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = target.refresh().await;
        tracing::info!("Initial {} refresh: {:?}", target.name(), outcome);

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let outcome = target.refresh().await;
                    tracing::info!("Scheduled {} refresh: {:?}", target.name(), outcome);
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::info!("{} refresh task shutting down", target.name());
                        break;
                    }
                }
            }
        }
    })
}

/// Owns the refresh tasks and their shutdown signal
pub struct RefreshSupervisor {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl RefreshSupervisor {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// Spawn a refresh task for `target`
    pub fn spawn<T: Refreshable>(&mut self, target: Arc<T>, interval: Duration) {
        let handle = spawn_refresh(target, interval, self.shutdown_tx.subscribe());
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Signal every task to stop and wait for them.
    ///
    /// A cycle already running is allowed to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("Refresh task failed: {}", e);
            }
        }
    }
}

impl Default for RefreshSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl Refreshable for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn refresh(&self) -> RefreshOutcome {
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            RefreshOutcome::Promoted { entries: n }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_immediately_then_periodically() {
        let counter = Arc::new(Counter::default());
        let mut supervisor = RefreshSupervisor::new();
        supervisor.spawn(counter.clone(), Duration::from_secs(60));
        assert_eq!(supervisor.len(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 3);

        supervisor.shutdown().await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_shutdown_stops_tasks() {
        let counter = Arc::new(Counter::default());
        let mut supervisor = RefreshSupervisor::default();
        supervisor.spawn(counter.clone(), Duration::from_secs(3600));
        supervisor.spawn(counter.clone(), Duration::from_secs(3600));

        // returns instead of waiting out the interval
        tokio::time::timeout(Duration::from_secs(5), supervisor.shutdown())
            .await
            .unwrap();
    }
}
