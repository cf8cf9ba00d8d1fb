// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the pipeline and its collaborators.

pub mod channel;
pub mod observer;

pub use channel::DeliveryChannel;
pub use observer::{DeliveryObserver, NoopObserver};
