//! Expiry Reaper Task
//!
//! Background task that periodically removes expired cache entries, so
//! entries that are never looked up again do not hold memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ExpiringCache;

// == Reaper Handle ==
/// Owns the lifecycle of a spawned reaper task.
///
/// The task stops when [`shutdown`](Self::shutdown) is awaited, when
/// [`abort`](Self::abort) is called, or when the handle is dropped — a cache
/// never leaks its reaper for the remaining process lifetime.
pub struct ReaperHandle {
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    /// Stops the reaper at its next suspension point and waits for it to
    /// finish.
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Stops the reaper immediately, without waiting.
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

// == Spawn ==
/// Spawns a background task that sweeps `cache` every `interval`.
///
/// Each sweep acquires the cache's write lock and purges expired entries,
/// so a sweep and a foreground `get`/`set` never interleave partially. The
/// sleep between sweeps is internal to the task and not observable by cache
/// callers.
pub fn spawn_reaper_task<V>(
    cache: Arc<RwLock<ExpiringCache<V>>>,
    interval: Duration,
) -> ReaperHandle
where
    V: Clone + Send + Sync + 'static,
{
    let shutdown = Arc::new(Notify::new());
    let stop = Arc::clone(&shutdown);

    let task = tokio::spawn(async move {
        info!("Starting expiry reaper with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = stop.notified() => {
                    debug!("Expiry reaper stopped");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    let removed = {
                        let mut cache_guard = cache.write().await;
                        cache_guard.purge_expired()
                    };

                    if removed > 0 {
                        info!("Expiry reaper removed {} entries", removed);
                    } else {
                        debug!("Expiry reaper found no expired entries");
                    }
                }
            }
        }
    });

    ReaperHandle {
        shutdown,
        task: Some(task),
    }
}
