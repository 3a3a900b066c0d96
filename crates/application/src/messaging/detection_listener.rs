use std::sync::Arc;

use domain::telemetry::DetectionEvent;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::tracking::PositionResolver;

/// Default worker count, matching the original consumer's concurrency.
pub const DEFAULT_WORKERS: usize = 4;

/// Bounded worker pool draining detection events from a channel.
///
/// Delivery upstream is at-least-once and unordered; idempotence lives in
/// the position resolver, so workers simply process each event to
/// completion and log failures. Conflicts are surfaced per event and never
/// retried here — the source redelivers.
pub struct DetectionWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl DetectionWorkerPool {
    /// Spawn `workers` tasks sharing `rx`. The pool drains until the
    /// channel closes or `cancel` fires.
    pub fn spawn(
        resolver: Arc<PositionResolver>,
        rx: mpsc::Receiver<DetectionEvent>,
        workers: usize,
        cancel: CancellationToken,
    ) -> Self {
        let rx = Arc::new(Mutex::new(rx));
        let workers = workers.max(1);
        info!(workers, "Starting detection worker pool");

        let handles = (0..workers)
            .map(|worker| {
                let resolver = resolver.clone();
                let rx = rx.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    loop {
                        let event = {
                            let mut rx = rx.lock().await;
                            tokio::select! {
                                _ = cancel.cancelled() => None,
                                event = rx.recv() => event,
                            }
                        };

                        let Some(event) = event else {
                            info!(worker, "Detection worker stopping");
                            break;
                        };

                        match resolver.process(&event).await {
                            Ok(outcome) => {
                                tracing::debug!(worker, ?outcome, "Detection processed");
                            }
                            Err(e) if e.is_conflict() => {
                                // Redelivery will retry; idempotence makes it safe.
                                warn!(worker, tag_code = %event.tag_code, error = %e,
                                    "Conflict while processing detection");
                            }
                            Err(e) => {
                                error!(worker, tag_code = %event.tag_code, error = %e,
                                    "Failed to process detection");
                            }
                        }
                    }
                })
            })
            .collect();

        Self { handles }
    }

    /// Wait for all workers to finish draining.
    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}
