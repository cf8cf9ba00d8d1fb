// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Photel.
//!
//! This crate provides the error taxonomy, the shared delivery types, and the
//! channel and observer traits used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PhotelError;
pub use traits::{DeliveryChannel, DeliveryObserver, NoopObserver};
pub use types::{Artifact, ChannelIdentity, DeliveryItem, HealthStatus};

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingChannel;

    #[async_trait::async_trait]
    impl DeliveryChannel for FailingChannel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn deliver(&self, _artifact: &Artifact) -> Result<(), PhotelError> {
            Err(PhotelError::Protocol {
                message: "down".into(),
                source: None,
            })
        }

        async fn send_text(&self, _text: &str) -> Result<(), PhotelError> {
            Ok(())
        }

        async fn identify(&self) -> Result<ChannelIdentity, PhotelError> {
            Err(PhotelError::Protocol {
                message: "unauthorized".into(),
                source: None,
            })
        }
    }

    #[tokio::test]
    async fn default_health_check_uses_identify() {
        let status = FailingChannel.health_check().await;
        match status {
            HealthStatus::Unhealthy(reason) => assert!(reason.contains("unauthorized")),
            HealthStatus::Healthy => panic!("expected unhealthy"),
        }
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_channel(_: &dyn DeliveryChannel) {}
        fn _assert_observer(_: &dyn DeliveryObserver) {}
        _assert_observer(&NoopObserver);
    }
}
