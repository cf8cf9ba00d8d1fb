// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unbounded FIFO between artifact producers and the delivery worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use photel_core::{DeliveryItem, PhotelError};
use tokio::sync::mpsc;

/// Create a connected sender/receiver pair.
pub fn delivery_queue() -> (DeliverySender, DeliveryReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        DeliverySender {
            tx,
            pending: Arc::clone(&pending),
        },
        DeliveryReceiver { rx, pending },
    )
}

/// Producer handle. Cheap to clone, one per producer.
#[derive(Debug, Clone)]
pub struct DeliverySender {
    tx: mpsc::UnboundedSender<DeliveryItem>,
    pending: Arc<AtomicUsize>,
}

impl DeliverySender {
    /// Append `item` to the queue. Never blocks.
    ///
    /// Fails only after the receiving worker has gone away.
    pub fn enqueue(&self, item: DeliveryItem) -> Result<(), PhotelError> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.tx.send(item).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            PhotelError::QueueClosed
        })
    }

    /// Items enqueued but not yet claimed by the worker.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Outcome of one [`DeliveryReceiver::dequeue`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued {
    Item(DeliveryItem),
    /// Nothing arrived before the timeout.
    Empty,
    /// Every sender is gone and the queue is drained.
    Closed,
}

/// Consumer handle owned by the single delivery worker.
#[derive(Debug)]
pub struct DeliveryReceiver {
    rx: mpsc::UnboundedReceiver<DeliveryItem>,
    pending: Arc<AtomicUsize>,
}

impl DeliveryReceiver {
    /// Wait up to `timeout` for the next item.
    pub async fn dequeue(&mut self, timeout: Duration) -> Dequeued {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(item)) => {
                self.claimed();
                Dequeued::Item(item)
            }
            Ok(None) => Dequeued::Closed,
            Err(_) => Dequeued::Empty,
        }
    }

    /// Items waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Stop accepting items and drain whatever is already queued.
    pub fn close_and_drain(&mut self) -> Vec<DeliveryItem> {
        self.rx.close();
        let mut left = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            self.claimed();
            left.push(item);
        }
        left
    }

    fn claimed(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> DeliveryItem {
        DeliveryItem::new(format!("/shots/{name}"), None)
    }

    #[tokio::test(start_paused = true)]
    async fn items_come_out_in_fifo_order() {
        let (tx, mut rx) = delivery_queue();
        for name in ["a.png", "b.png", "c.png"] {
            tx.enqueue(item(name)).unwrap();
        }
        assert_eq!(rx.len(), 3);
        assert_eq!(tx.pending(), 3);

        let timeout = Duration::from_secs(1);
        for name in ["a.png", "b.png", "c.png"] {
            assert_eq!(rx.dequeue(timeout).await, Dequeued::Item(item(name)));
        }
        assert!(rx.is_empty());
        assert_eq!(tx.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_queue_times_out() {
        let (_tx, mut rx) = delivery_queue();
        let start = tokio::time::Instant::now();
        assert_eq!(rx.dequeue(Duration::from_secs(1)).await, Dequeued::Empty);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_only_after_drain() {
        let (tx, mut rx) = delivery_queue();
        tx.enqueue(item("last.png")).unwrap();
        drop(tx);

        let timeout = Duration::from_secs(1);
        assert_eq!(rx.dequeue(timeout).await, Dequeued::Item(item("last.png")));
        assert_eq!(rx.dequeue(timeout).await, Dequeued::Closed);
    }

    #[test]
    fn enqueue_after_receiver_dropped_fails() {
        let (tx, rx) = delivery_queue();
        drop(rx);
        assert!(tx.is_closed());
        assert!(matches!(
            tx.enqueue(item("late.png")),
            Err(PhotelError::QueueClosed)
        ));
        assert_eq!(tx.pending(), 0);
    }

    #[test]
    fn close_and_drain_returns_leftovers() {
        let (tx, mut rx) = delivery_queue();
        tx.enqueue(item("x.png")).unwrap();
        tx.enqueue(item("y.png")).unwrap();

        let left = rx.close_and_drain();
        assert_eq!(left, vec![item("x.png"), item("y.png")]);
        assert_eq!(tx.pending(), 0);
        assert!(tx.enqueue(item("z.png")).is_err());
    }
}
