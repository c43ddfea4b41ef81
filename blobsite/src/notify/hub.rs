//! Channel-backed observer source.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::bus::{NotifyError, Observer, ObserverSource};
use super::event::SiteEvent;

struct ChannelObserver {
    tx: mpsc::UnboundedSender<SiteEvent>,
}

impl Observer for ChannelObserver {
    fn post(&self, event: &SiteEvent) -> Result<(), NotifyError> {
        self.tx
            .send(event.clone())
            .map_err(|_| NotifyError::Disconnected)
    }
}

/// Hands out event receivers; each live receiver is an active observer.
///
/// Receivers that have been dropped are pruned the next time observers are
/// enumerated.
#[derive(Default)]
pub struct ObserverHub {
    observers: Mutex<Vec<Arc<ChannelObserver>>>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new observer.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SiteEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.lock().push(Arc::new(ChannelObserver { tx }));
        rx
    }

    /// Observers whose receiver is still alive.
    pub fn observer_count(&self) -> usize {
        let mut observers = self.observers.lock();
        observers.retain(|o| !o.tx.is_closed());
        observers.len()
    }
}

impl ObserverSource for ObserverHub {
    fn active_observers(&self) -> Vec<Arc<dyn Observer>> {
        let mut observers = self.observers.lock();
        observers.retain(|o| !o.tx.is_closed());
        observers
            .iter()
            .map(|o| Arc::clone(o) as Arc<dyn Observer>)
            .collect()
    }
}
