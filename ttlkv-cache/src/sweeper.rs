//! Background sweeping of expired entries.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, instrument};

use crate::cache::CacheInner;

/// Owns a running sweep task. Dropping it signals the task to stop.
#[derive(Debug)]
pub(crate) struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Spawns the sweep loop on the current Tokio runtime.
    pub(crate) fn spawn<K, V>(
        runtime: &tokio::runtime::Handle,
        cache: Weak<CacheInner<K, V>>,
        interval: Duration,
    ) -> Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(sweep_loop(cache, interval, shutdown_rx));
        Self {
            shutdown,
            task: Some(task),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signals the task and waits for it to exit.
    pub(crate) async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        // Receiver is gone if the task already exited.
        let _ = self.shutdown.send(true);
    }
}

/// Periodically purges expired entries until told to stop or the cache is gone.
///
/// Only a weak reference is held, so the sweeper never keeps a dropped cache
/// alive. Passes run back to back on a single task and never overlap.
#[instrument(skip_all, fields(interval = ?interval))]
async fn sweep_loop<K, V>(
    cache: Weak<CacheInner<K, V>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Eq + Hash,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the immediate first tick
    ticker.tick().await;

    debug!("Sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(inner) = cache.upgrade() else {
                    break;
                };
                let removed = inner.purge_expired();
                if removed > 0 {
                    debug!(removed, "Swept expired entries");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    debug!("Sweeper stopped");
}
