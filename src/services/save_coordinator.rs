//! Save orchestration: one upload attempt per save, a durable fallback queue on failure and
//! a single cancellable retry timer per coordinator.

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::{
    dao::{
        fallback_queue::{FallbackQueue, QueueResult},
        gateway::{DocumentKey, PersistenceGateway},
        models::ScorecardDocument,
        storage::StorageError,
    },
    state::{ids::ScorecardId, scorecard::ScorecardAggregate},
};

/// Delay between a failed upload and the next pass over the fallback queue.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(15);

/// Externally visible state of the save pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// Nothing in flight and nothing waiting.
    Idle,
    /// An upload or a retry pass is running.
    Saving,
    /// At least one payload waits in the fallback queue for the retry timer.
    Queued,
}

/// Result of a single save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Upload confirmed by the remote store.
    Saved,
    /// Upload failed; payload kept in the fallback queue and a retry scheduled.
    Queued,
    /// Upload failed and the fallback queue could not be written either.
    NotQueued,
}

/// Tally of one pass over the fallback queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetryReport {
    /// Entries uploaded and removed.
    pub uploaded: usize,
    /// Entries gone before they could be read (handled by another session).
    pub skipped: usize,
    /// Entries still pending.
    pub failed: usize,
}

/// Scheduled retry; dropping it cancels the timer if it has not fired yet.
struct RetryHandle {
    generation: u64,
    _cancel: oneshot::Sender<()>,
}

struct Inner {
    gateway: Arc<dyn PersistenceGateway>,
    queue: FallbackQueue,
    retry_interval: Duration,
    retry: Mutex<Option<RetryHandle>>,
    generation: AtomicU64,
    status: watch::Sender<SaveStatus>,
}

/// Coordinates uploads, the fallback queue and the retry timer.
///
/// Cloning is cheap; clones share the same timer and status.
#[derive(Clone)]
pub struct SaveCoordinator {
    inner: Arc<Inner>,
}

impl SaveCoordinator {
    /// Build a coordinator in the idle state.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        queue: FallbackQueue,
        retry_interval: Duration,
    ) -> Self {
        let (status, _rx) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                gateway,
                queue,
                retry_interval,
                retry: Mutex::new(None),
                generation: AtomicU64::new(0),
                status,
            }),
        }
    }

    /// Fallback queue backing this coordinator.
    pub fn queue(&self) -> &FallbackQueue {
        &self.inner.queue
    }

    /// Current status.
    pub fn status(&self) -> SaveStatus {
        *self.inner.status.borrow()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }

    /// Whether a retry timer is armed and has not fired yet.
    pub fn has_pending_retry(&self) -> bool {
        self.retry_slot().is_some()
    }

    /// Serialize `scorecard` into the persisted document form.
    pub fn serialize(scorecard: &ScorecardAggregate) -> serde_json::Result<(ScorecardId, String)> {
        let payload = serde_json::to_string(&ScorecardDocument::from(scorecard))?;
        Ok((scorecard.id().clone(), payload))
    }

    /// Serialize and upload `scorecard`, waiting for the outcome.
    pub async fn save(&self, scorecard: &ScorecardAggregate) -> serde_json::Result<SaveOutcome> {
        let (id, payload) = Self::serialize(scorecard)?;
        Ok(self.save_payload(&id, payload).await)
    }

    /// Upload in the background so the caller can keep editing.
    pub fn spawn_save(&self, id: ScorecardId, payload: String) -> JoinHandle<SaveOutcome> {
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.save_payload(&id, payload).await })
    }

    /// Upload an already serialized scorecard.
    ///
    /// Cancels the armed retry timer first; uploads already in flight are left alone.
    pub async fn save_payload(&self, id: &ScorecardId, payload: String) -> SaveOutcome {
        if self.cancel_retry() {
            debug!(scorecard_id = %id, "cancelled pending retry in favour of a new save");
        }
        self.set_status(SaveStatus::Saving);

        let upload = self
            .inner
            .gateway
            .upload(DocumentKey::scorecard(id.as_str()), payload.clone())
            .await;

        match upload {
            Ok(()) => {
                let key = self.inner.queue.key_for(id.as_str());
                // A newer save may have queued a different payload under this key meanwhile.
                match self.inner.queue.remove_if_unchanged(&key, &payload).await {
                    Ok(true) => debug!(key = %key, "cleared fallback entry after save"),
                    Ok(false) => {}
                    Err(err) => warn!(key = %key, error = %err, "failed to clear fallback entry"),
                }
                info!(scorecard_id = %id, "scorecard saved");
                self.settle_status();
                SaveOutcome::Saved
            }
            Err(err) => {
                log_upload_failure(id.as_str(), &err);
                match self.inner.queue.put(id.as_str(), &payload).await {
                    Ok(key) => {
                        info!(key = %key, "scorecard kept in fallback queue");
                        self.set_status(SaveStatus::Queued);
                        self.schedule_retry();
                        SaveOutcome::Queued
                    }
                    Err(queue_err) => {
                        error!(
                            scorecard_id = %id,
                            error = %queue_err,
                            "failed to write fallback queue; scorecard only kept in memory"
                        );
                        self.settle_status();
                        SaveOutcome::NotQueued
                    }
                }
            }
        }
    }

    /// Arm the retry timer, replacing any timer already armed.
    pub fn schedule_retry(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (cancel, cancelled) = oneshot::channel::<()>();
        let previous = self.retry_slot().replace(RetryHandle {
            generation,
            _cancel: cancel,
        });
        drop(previous);

        let coordinator = self.clone();
        let interval = self.inner.retry_interval;
        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(interval) => {}
                _ = cancelled => {
                    debug!(generation, "retry timer cancelled");
                    return;
                }
            }
            coordinator.fire_retry(generation).await;
        });
        debug!(generation, interval_ms = interval.as_millis() as u64, "retry scheduled");
    }

    /// Disarm the retry timer. Returns whether one was armed.
    pub fn cancel_retry(&self) -> bool {
        self.retry_slot().take().is_some()
    }

    /// Upload every entry in the fallback queue, including entries left by other sessions.
    pub async fn retry_pending(&self) -> RetryReport {
        self.set_status(SaveStatus::Saving);
        let mut report = RetryReport::default();

        let keys = match self.inner.queue.keys().await {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "failed to scan fallback queue");
                report.failed += 1;
                self.finish_retry(report);
                return report;
            }
        };

        for key in keys {
            let Some(suffix) = self.inner.queue.suffix_of(&key) else {
                continue;
            };
            let payload = match self.inner.queue.get(&key).await {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    debug!(key = %key, "fallback entry already uploaded elsewhere; skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "failed to read fallback entry");
                    report.failed += 1;
                    continue;
                }
            };

            let upload = self
                .inner
                .gateway
                .upload(DocumentKey::scorecard(suffix), payload.clone())
                .await;
            match upload {
                Ok(()) => {
                    if let Err(err) = self.inner.queue.remove_if_unchanged(&key, &payload).await {
                        warn!(key = %key, error = %err, "uploaded fallback entry could not be removed");
                    }
                    report.uploaded += 1;
                }
                Err(err) => {
                    log_upload_failure(suffix, &err);
                    report.failed += 1;
                }
            }
        }

        self.finish_retry(report);
        report
    }

    /// Arm a retry when an earlier session left entries behind. Returns the number found.
    pub async fn resume(&self) -> QueueResult<usize> {
        let pending = self.inner.queue.len().await?;
        if pending > 0 {
            info!(pending, "fallback queue not empty at start-up; scheduling retry");
            self.set_status(SaveStatus::Queued);
            self.schedule_retry();
        }
        Ok(pending)
    }

    async fn fire_retry(&self, generation: u64) {
        {
            let mut slot = self.retry_slot();
            if slot.as_ref().map(|handle| handle.generation) != Some(generation) {
                return;
            }
            slot.take();
        }
        self.retry_pending().await;
    }

    fn finish_retry(&self, report: RetryReport) {
        info!(
            uploaded = report.uploaded,
            skipped = report.skipped,
            failed = report.failed,
            "fallback queue pass finished"
        );
        if report.failed > 0 {
            self.set_status(SaveStatus::Queued);
            self.schedule_retry();
        } else {
            self.settle_status();
        }
    }

    /// Leave `Saving`: `Queued` while a retry is still armed, `Idle` otherwise.
    fn settle_status(&self) {
        if self.has_pending_retry() {
            self.set_status(SaveStatus::Queued);
        } else {
            self.set_status(SaveStatus::Idle);
        }
    }

    fn set_status(&self, status: SaveStatus) {
        let previous = self.inner.status.send_replace(status);
        if previous != status {
            debug!(?previous, current = ?status, "save status changed");
        }
    }

    fn retry_slot(&self) -> MutexGuard<'_, Option<RetryHandle>> {
        self.inner
            .retry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_upload_failure(id: &str, err: &StorageError) {
    if err.is_rejection() {
        warn!(scorecard_id = %id, error = %err, "remote store rejected scorecard; retrying anyway");
    } else {
        warn!(scorecard_id = %id, error = %err, "scorecard upload failed");
    }
}
