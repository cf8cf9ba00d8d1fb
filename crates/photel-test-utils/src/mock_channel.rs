// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery channel for deterministic testing.
//!
//! `MockChannel` implements `DeliveryChannel` with scriptable failures and
//! captures every attempt, delivered artifact and text message for assertion.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use photel_core::types::{Artifact, ChannelIdentity};
use photel_core::{DeliveryChannel, PhotelError};

/// One call to [`DeliveryChannel::deliver`] as seen by the mock.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub file_name: String,
    pub caption: Option<String>,
    pub len: usize,
    /// When the call started, on tokio's (possibly paused) clock.
    pub at: Instant,
    pub succeeded: bool,
}

#[derive(Default)]
struct Script {
    /// Outcomes consumed one per `deliver` call; empty means success.
    outcomes: VecDeque<bool>,
    /// File names that fail on every attempt.
    failing_files: HashSet<String>,
    fail_identify: bool,
    fail_text: bool,
}

/// A mock delivery channel for testing.
///
/// Every `deliver` call is recorded in [`attempts`](Self::attempts).
/// Successful ones additionally land in [`delivered`](Self::delivered).
pub struct MockChannel {
    script: Arc<Mutex<Script>>,
    attempts: Arc<Mutex<Vec<DeliveryAttempt>>>,
    delivered: Arc<Mutex<Vec<Artifact>>>,
    texts: Arc<Mutex<Vec<String>>>,
    latency: Duration,
}

impl MockChannel {
    /// Create a mock that accepts everything.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            attempts: Arc::new(Mutex::new(Vec::new())),
            delivered: Arc::new(Mutex::new(Vec::new())),
            texts: Arc::new(Mutex::new(Vec::new())),
            latency: Duration::ZERO,
        }
    }

    /// Each delivery takes `latency` on tokio's clock before it resolves.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The next `n` deliveries fail, whatever the artifact.
    pub async fn fail_next(&self, n: usize) {
        let mut script = self.script.lock().await;
        script.outcomes.extend(std::iter::repeat_n(false, n));
    }

    /// Queue explicit outcomes (`true` = success) for upcoming deliveries.
    pub async fn script_outcomes(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.script.lock().await.outcomes.extend(outcomes);
    }

    /// Every delivery of `file_name` fails.
    pub async fn always_fail(&self, file_name: &str) {
        self.script
            .lock()
            .await
            .failing_files
            .insert(file_name.to_string());
    }

    /// `identify` reports an unauthorized token.
    pub async fn reject_identify(&self) {
        self.script.lock().await.fail_identify = true;
    }

    /// `send_text` fails.
    pub async fn reject_text(&self) {
        self.script.lock().await.fail_text = true;
    }

    /// All recorded `deliver` calls, in order.
    pub async fn attempts(&self) -> Vec<DeliveryAttempt> {
        self.attempts.lock().await.clone()
    }

    /// Number of `deliver` calls made so far.
    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }

    /// Artifacts that were accepted, in order.
    pub async fn delivered(&self) -> Vec<Artifact> {
        self.delivered.lock().await.clone()
    }

    /// File names of accepted artifacts, in order.
    pub async fn delivered_names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .await
            .iter()
            .map(|a| a.file_name.clone())
            .collect()
    }

    /// Text messages that were sent.
    pub async fn texts(&self) -> Vec<String> {
        self.texts.lock().await.clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn refused(what: &str) -> PhotelError {
    PhotelError::Protocol {
        message: format!("mock channel refused {what}"),
        source: None,
    }
}

#[async_trait]
impl DeliveryChannel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn deliver(&self, artifact: &Artifact) -> Result<(), PhotelError> {
        let at = Instant::now();
        let succeeded = {
            let mut script = self.script.lock().await;
            let scripted = script.outcomes.pop_front().unwrap_or(true);
            scripted && !script.failing_files.contains(&artifact.file_name)
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.attempts.lock().await.push(DeliveryAttempt {
            file_name: artifact.file_name.clone(),
            caption: artifact.caption.clone(),
            len: artifact.bytes.len(),
            at,
            succeeded,
        });

        if succeeded {
            self.delivered.lock().await.push(artifact.clone());
            Ok(())
        } else {
            Err(refused(&artifact.file_name))
        }
    }

    async fn send_text(&self, text: &str) -> Result<(), PhotelError> {
        if self.script.lock().await.fail_text {
            return Err(refused("text message"));
        }
        self.texts.lock().await.push(text.to_string());
        Ok(())
    }

    async fn identify(&self) -> Result<ChannelIdentity, PhotelError> {
        if self.script.lock().await.fail_identify {
            return Err(refused("token"));
        }
        Ok(ChannelIdentity {
            id: "1".to_string(),
            username: Some("mock_bot".to_string()),
        })
    }
}
