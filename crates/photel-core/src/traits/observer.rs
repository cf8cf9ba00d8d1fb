// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer hooks for delivery outcomes.

use std::path::Path;

use crate::error::PhotelError;
use crate::types::DeliveryItem;

/// Receives delivery lifecycle events from the worker.
///
/// Injected into the worker at construction. All methods default to no-ops so
/// implementations only override what they care about. Calls happen on the
/// worker task and must not block.
pub trait DeliveryObserver: Send + Sync + 'static {
    /// A single attempt failed. `attempt` is 1-indexed.
    fn attempt_failed(&self, _item: &DeliveryItem, _attempt: u32, _error: &PhotelError) {}

    /// The item was delivered after `attempts` attempts.
    fn delivered(&self, _item: &DeliveryItem, _attempts: u32) {}

    /// The item exhausted its attempts and now lives at `destination`.
    fn held(&self, _item: &DeliveryItem, _destination: &Path) {}

    /// The item exhausted its attempts and could not be relocated.
    fn left_in_place(&self, _item: &DeliveryItem) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DeliveryObserver for NoopObserver {}
