// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel trait for the remote destination artifacts are shipped to.

use async_trait::async_trait;

use crate::error::PhotelError;
use crate::types::{Artifact, ChannelIdentity, HealthStatus};

/// A remote channel that accepts artifacts and text messages.
///
/// Implementations wrap a bot-protocol client. Every failure surfaces as
/// [`PhotelError::Protocol`]; retrying is the caller's concern.
#[async_trait]
pub trait DeliveryChannel: Send + Sync + 'static {
    /// Returns the human-readable name of this channel implementation.
    fn name(&self) -> &str;

    /// Delivers one artifact with its optional caption.
    async fn deliver(&self, artifact: &Artifact) -> Result<(), PhotelError>;

    /// Sends a plain text message to the channel.
    async fn send_text(&self, text: &str) -> Result<(), PhotelError>;

    /// Checks that the configured credentials are usable.
    async fn identify(&self) -> Result<ChannelIdentity, PhotelError>;

    /// Performs a health check built on [`identify`](Self::identify).
    async fn health_check(&self) -> HealthStatus {
        match self.identify().await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
