//! Multi-producer / single-consumer event queue.
//!
//! Unbounded: the queue itself never drops an event. Burst handling is the
//! consumer's job (see the drain cap in `UpdateLoop`).

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::metrics::MetricEvent;
use crate::error::{Result, VitalsError};

/// Create a connected sender/receiver pair.
pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer side; clone one per producer.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<MetricEvent>,
}

impl EventSender {
    /// Enqueue an event. Fails only when the receiver has been dropped.
    pub fn push(&self, event: MetricEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| VitalsError::QueueClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the update loop.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<MetricEvent>,
}

impl EventReceiver {
    /// Next event if one is pending; never blocks.
    pub fn try_pop(&mut self) -> Option<MetricEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Number of events waiting to be consumed.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
