// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the delivery pipeline and channel adapters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A locally produced artifact waiting to be shipped to the channel.
///
/// Owned by the delivery queue from enqueue until the worker claims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryItem {
    /// Path of the artifact on disk.
    pub artifact_path: PathBuf,
    /// Optional caption sent alongside the artifact.
    pub caption: Option<String>,
}

impl DeliveryItem {
    /// Creates a new item. Blank captions are normalized to `None`.
    pub fn new(artifact_path: impl Into<PathBuf>, caption: Option<String>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            caption: caption.filter(|c| !c.trim().is_empty()),
        }
    }

    /// The artifact's file name, used for uploads and for the holding directory.
    pub fn file_name(&self) -> String {
        file_name_of(&self.artifact_path)
    }
}

/// The payload handed to a channel for a single delivery attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .field("caption", &self.caption)
            .finish()
    }
}

/// Identity reported by a channel when its credentials are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdentity {
    /// Numeric or opaque account id.
    pub id: String,
    /// Human-readable handle, e.g. the bot username.
    pub username: Option<String>,
}

/// Health status reported by channel health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Channel is fully operational.
    Healthy,
    /// Channel is not operational.
    Unhealthy(String),
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string())
}
