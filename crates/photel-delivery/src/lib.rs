// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reliable artifact delivery for Photel.
//!
//! Producers hand artifacts to an [`Uploader`]; a single background worker
//! ships them to a [`DeliveryChannel`](photel_core::DeliveryChannel) with
//! bounded exponential backoff, deletes what was delivered and moves what
//! could not be delivered into a holding directory.

pub mod janitor;
pub mod queue;
pub mod retry;
pub mod worker;

pub use queue::{delivery_queue, DeliveryReceiver, DeliverySender, Dequeued};
pub use retry::RetryPolicy;
pub use worker::{DeliverySettings, Uploader, WorkerState};
