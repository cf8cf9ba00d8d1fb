// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Photel integration tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable tests
//! without a real bot API.
//!
//! # Components
//!
//! - [`MockChannel`] - Delivery channel with scriptable failures and captured artifacts
//! - [`RecordingObserver`] - Observer that records delivery events in order

pub mod mock_channel;
pub mod observer;

pub use mock_channel::{DeliveryAttempt, MockChannel};
pub use observer::{write_artifact, DeliveryEvent, RecordingObserver};
