// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The delivery worker task and its producer-facing handle.
//!
//! A single worker drains the queue in FIFO order with one delivery in
//! flight. Each item is tried up to `max_attempts` times with exponential
//! backoff in between; delivered artifacts are deleted, artifacts that
//! exhaust their attempts go to the holding directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use photel_config::model::DeliveryConfig;
use photel_core::{Artifact, DeliveryChannel, DeliveryItem, DeliveryObserver, PhotelError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::janitor::{move_to_holding, safe_delete};
use crate::queue::{DeliveryReceiver, DeliverySender, Dequeued, delivery_queue};
use crate::retry::RetryPolicy;

/// Lifecycle of the worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next item.
    Idle,
    /// An item's attempt sequence is running.
    Delivering,
    /// The task has exited. Terminal.
    Stopped,
}

/// Tunables for the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettings {
    pub retry: RetryPolicy,
    /// Upper bound on how long the worker waits on an empty queue before it
    /// re-checks for stop.
    pub poll_interval: Duration,
    pub delete_attempts: u32,
    pub delete_delay: Duration,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self::from_config(&DeliveryConfig::default())
    }
}

impl DeliverySettings {
    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self {
            retry: RetryPolicy::from_config(config),
            poll_interval: config.poll_interval(),
            delete_attempts: config.delete_attempts,
            delete_delay: config.delete_delay(),
        }
    }
}

type HoldingDir = Arc<ArcSwapOption<PathBuf>>;

struct DeliveryWorker {
    channel: Arc<dyn DeliveryChannel>,
    observer: Arc<dyn DeliveryObserver>,
    settings: DeliverySettings,
    receiver: DeliveryReceiver,
    holding_dir: HoldingDir,
    state: watch::Sender<WorkerState>,
    cancel: CancellationToken,
}

impl DeliveryWorker {
    async fn run(mut self) {
        info!(channel = self.channel.name(), "delivery worker started");

        loop {
            if self.cancel.is_cancelled() {
                debug!("stop requested");
                break;
            }

            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => continue,
                next = self.receiver.dequeue(self.settings.poll_interval) => next,
            };

            match next {
                Dequeued::Item(item) => self.process(item).await,
                Dequeued::Empty => continue,
                Dequeued::Closed => {
                    debug!("all producers gone and queue drained");
                    break;
                }
            }
        }

        let left = self.receiver.close_and_drain();
        if !left.is_empty() {
            warn!(
                count = left.len(),
                "worker stopped with items still queued, artifacts left on disk"
            );
            for item in &left {
                info!(path = %item.artifact_path.display(), "undelivered artifact left in place");
            }
        }

        self.state.send_replace(WorkerState::Stopped);
        info!("delivery worker stopped");
    }

    /// Runs the full attempt sequence for one item, then disposes of it.
    async fn process(&self, item: DeliveryItem) {
        self.state.send_replace(WorkerState::Delivering);
        let policy = self.settings.retry;
        let max = policy.attempts();

        for attempt in 0..max {
            match self.attempt(&item).await {
                Ok(()) => {
                    info!(
                        path = %item.artifact_path.display(),
                        attempt = attempt + 1,
                        "artifact delivered"
                    );
                    safe_delete(
                        &item.artifact_path,
                        self.settings.delete_attempts,
                        self.settings.delete_delay,
                    )
                    .await;
                    self.observer.delivered(&item, attempt + 1);
                    self.state.send_replace(WorkerState::Idle);
                    return;
                }
                Err(e) => {
                    warn!(
                        path = %item.artifact_path.display(),
                        attempt = attempt + 1,
                        max,
                        error = %e,
                        "delivery attempt failed"
                    );
                    self.observer.attempt_failed(&item, attempt + 1, &e);
                    if !policy.is_final_attempt(attempt) {
                        tokio::time::sleep(policy.backoff(attempt)).await;
                    }
                }
            }
        }

        error!(
            path = %item.artifact_path.display(),
            attempts = max,
            "delivery failed permanently"
        );
        self.dispose_failed(&item).await;
        self.state.send_replace(WorkerState::Idle);
    }

    async fn attempt(&self, item: &DeliveryItem) -> Result<(), PhotelError> {
        let bytes = tokio::fs::read(&item.artifact_path)
            .await
            .map_err(|source| PhotelError::Artifact {
                path: item.artifact_path.clone(),
                source,
            })?;
        let artifact = Artifact {
            file_name: item.file_name(),
            bytes,
            caption: item.caption.clone(),
        };
        self.channel.deliver(&artifact).await
    }

    async fn dispose_failed(&self, item: &DeliveryItem) {
        let Some(dir) = self.holding_dir.load_full() else {
            warn!(
                path = %item.artifact_path.display(),
                "no holding directory configured, artifact left in place"
            );
            self.observer.left_in_place(item);
            return;
        };

        match move_to_holding(&item.artifact_path, &dir).await {
            Some(destination) => self.observer.held(item, &destination),
            None => self.observer.left_in_place(item),
        }
    }
}

/// Producer-facing handle that owns the worker task.
///
/// Dropping the handle without calling [`stop`](Self::stop) or
/// [`finish`](Self::finish) cancels the worker; an item in flight still
/// completes its attempt sequence.
pub struct Uploader {
    sender: Option<DeliverySender>,
    holding_dir: HoldingDir,
    state: watch::Receiver<WorkerState>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Uploader {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(
        channel: Arc<dyn DeliveryChannel>,
        settings: DeliverySettings,
        observer: Arc<dyn DeliveryObserver>,
    ) -> Self {
        let (sender, receiver) = delivery_queue();
        let (state_tx, state_rx) = watch::channel(WorkerState::Idle);
        let holding_dir: HoldingDir = Arc::new(ArcSwapOption::empty());
        let cancel = CancellationToken::new();

        let span = info_span!("delivery_worker", channel = channel.name());
        let worker = DeliveryWorker {
            channel,
            observer,
            settings,
            receiver,
            holding_dir: Arc::clone(&holding_dir),
            state: state_tx,
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(worker.run().instrument(span));

        Self {
            sender: Some(sender),
            holding_dir,
            state: state_rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Create `dir` if needed and use it for artifacts that exhaust their
    /// attempts. Takes effect for the next permanently failed item.
    pub fn configure_holding_dir(&self, dir: impl AsRef<Path>) -> Result<(), PhotelError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| PhotelError::Persistence {
            message: format!("failed to create holding directory {}", dir.display()),
            source: Some(Box::new(e)),
        })?;
        self.holding_dir.store(Some(Arc::new(dir.to_path_buf())));
        info!(dir = %dir.display(), "holding directory configured");
        Ok(())
    }

    /// Queue an artifact for delivery. Never blocks.
    pub fn enqueue(
        &self,
        path: impl Into<PathBuf>,
        caption: Option<String>,
    ) -> Result<(), PhotelError> {
        let item = DeliveryItem::new(path, caption);
        let sender = self.sender.as_ref().ok_or(PhotelError::QueueClosed)?;
        debug!(path = %item.artifact_path.display(), "artifact queued");
        sender.enqueue(item)
    }

    /// A sender for producers on other tasks or threads.
    pub fn sender(&self) -> Option<DeliverySender> {
        self.sender.clone()
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<WorkerState> {
        self.state.clone()
    }

    /// Items queued but not yet picked up by the worker.
    pub fn pending(&self) -> usize {
        self.sender.as_ref().map_or(0, DeliverySender::pending)
    }

    /// Ask the worker to stop without waiting. Idempotent.
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }

    /// Token that stops the worker when cancelled, for callers that hand the
    /// uploader to [`finish`](Self::finish) but may still need to interrupt it.
    pub fn stop_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// An item in flight finishes its attempt sequence first. Items still
    /// queued are not delivered.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        self.join().await;
    }

    /// Deliver everything already queued, then wait for the worker to exit.
    ///
    /// Returns once every other [`DeliverySender`] is dropped as well.
    pub async fn finish(mut self) {
        drop(self.sender.take());
        self.join().await;
    }

    async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "delivery worker task failed");
            }
        }
    }
}

impl Drop for Uploader {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("state", &self.state())
            .field("pending", &self.pending())
            .finish()
    }
}
