// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer that records every delivery event it receives.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use photel_core::{DeliveryItem, DeliveryObserver, PhotelError};

/// A delivery lifecycle event, keyed by artifact file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
    AttemptFailed { file: String, attempt: u32 },
    Delivered { file: String, attempts: u32 },
    Held { file: String, destination: PathBuf },
    LeftInPlace { file: String },
}

/// Records observer calls in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<DeliveryEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<DeliveryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: DeliveryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl DeliveryObserver for RecordingObserver {
    fn attempt_failed(&self, item: &DeliveryItem, attempt: u32, _error: &PhotelError) {
        self.push(DeliveryEvent::AttemptFailed {
            file: item.file_name(),
            attempt,
        });
    }

    fn delivered(&self, item: &DeliveryItem, attempts: u32) {
        self.push(DeliveryEvent::Delivered {
            file: item.file_name(),
            attempts,
        });
    }

    fn held(&self, item: &DeliveryItem, destination: &Path) {
        self.push(DeliveryEvent::Held {
            file: item.file_name(),
            destination: destination.to_path_buf(),
        });
    }

    fn left_in_place(&self, item: &DeliveryItem) {
        self.push(DeliveryEvent::LeftInPlace {
            file: item.file_name(),
        });
    }
}

/// Write an artifact file named `name` under `dir` and return its path.
pub fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Err(e) = std::fs::write(&path, bytes) {
        panic!("failed to write test artifact {}: {e}", path.display());
    }
    path
}
