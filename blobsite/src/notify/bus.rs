//! Observer capability traits and the notification bus.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::event::SiteEvent;

/// Delivery to a single observer failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The observer has gone away.
    #[error("observer disconnected")]
    Disconnected,
}

/// A connected observer.
///
/// `post` must not block; implementations queue the event and return.
pub trait Observer: Send + Sync {
    fn post(&self, event: &SiteEvent) -> Result<(), NotifyError>;
}

/// Enumerates the observers connected right now.
pub trait ObserverSource: Send + Sync {
    fn active_observers(&self) -> Vec<Arc<dyn Observer>>;
}

/// Source with nobody listening.
struct NoObservers;

impl ObserverSource for NoObservers {
    fn active_observers(&self) -> Vec<Arc<dyn Observer>> {
        Vec::new()
    }
}

/// Broadcasts events and tracks the once-per-generation success flag.
///
/// A generation is the span between two registry loads. `Success` is
/// announced at most once per generation; the check-and-set is a single
/// atomic compare-exchange, so concurrent first successes announce once.
pub struct NotificationBus {
    source: Arc<dyn ObserverSource>,
    success_announced: AtomicBool,
}

impl NotificationBus {
    pub fn new(source: Arc<dyn ObserverSource>) -> Self {
        Self {
            source,
            success_announced: AtomicBool::new(false),
        }
    }

    /// A bus with no observers.
    pub fn silent() -> Self {
        Self::new(Arc::new(NoObservers))
    }

    /// Post `event` to every active observer.
    ///
    /// Individual delivery failures are logged and skipped. Returns the
    /// number of observers that accepted the event.
    pub fn notify(&self, event: &SiteEvent) -> usize {
        let mut delivered = 0;
        for observer in self.source.active_observers() {
            match observer.post(event) {
                Ok(()) => delivered += 1,
                Err(e) => debug!(kind = event.kind(), error = %e, "Observer delivery failed"),
            }
        }
        delivered
    }

    pub fn loading(&self, path: &str) {
        self.notify(&SiteEvent::loading(path));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(&SiteEvent::error(message));
    }

    /// Announce `Success` unless it already fired in this generation.
    ///
    /// Returns whether this call announced it.
    pub fn success(&self) -> bool {
        let first = self
            .success_announced
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            self.notify(&SiteEvent::Success);
        }
        first
    }

    /// Start a new generation.
    pub fn reset_generation(&self) {
        self.success_announced.store(false, Ordering::Release);
    }

    pub fn success_announced(&self) -> bool {
        self.success_announced.load(Ordering::Acquire)
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SiteEvent>>,
    }

    impl Observer for Recorder {
        fn post(&self, event: &SiteEvent) -> Result<(), NotifyError> {
            self.events.lock().push(event.clone());
            Ok(())
        }
    }

    struct Gone;

    impl Observer for Gone {
        fn post(&self, _event: &SiteEvent) -> Result<(), NotifyError> {
            Err(NotifyError::Disconnected)
        }
    }

    struct Fixed(Vec<Arc<dyn Observer>>);

    impl ObserverSource for Fixed {
        fn active_observers(&self) -> Vec<Arc<dyn Observer>> {
            self.0.clone()
        }
    }

    fn bus_with(observers: Vec<Arc<dyn Observer>>) -> NotificationBus {
        NotificationBus::new(Arc::new(Fixed(observers)))
    }

    #[test]
    fn test_notify_reaches_every_observer() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let bus = bus_with(vec![a.clone(), b.clone()]);

        let delivered = bus.notify(&SiteEvent::loading("/a"));

        assert_eq!(delivered, 2);
        assert_eq!(a.events.lock().as_slice(), &[SiteEvent::loading("/a")]);
        assert_eq!(b.events.lock().as_slice(), &[SiteEvent::loading("/a")]);
    }

    #[test]
    fn test_failing_observer_does_not_block_others() {
        let a = Arc::new(Recorder::default());
        let bus = bus_with(vec![Arc::new(Gone), a.clone()]);

        let delivered = bus.notify(&SiteEvent::Success);

        assert_eq!(delivered, 1);
        assert_eq!(a.events.lock().len(), 1);
    }

    #[test]
    fn test_success_once_per_generation() {
        let recorder = Arc::new(Recorder::default());
        let bus = bus_with(vec![recorder.clone()]);

        assert!(bus.success());
        assert!(!bus.success());
        assert!(!bus.success());
        assert!(bus.success_announced());

        bus.reset_generation();
        assert!(!bus.success_announced());
        assert!(bus.success());
        assert!(!bus.success());

        let successes = recorder
            .events
            .lock()
            .iter()
            .filter(|e| **e == SiteEvent::Success)
            .count();
        assert_eq!(successes, 2);
    }

    #[test]
    fn test_errors_are_not_deduplicated() {
        let recorder = Arc::new(Recorder::default());
        let bus = bus_with(vec![recorder.clone()]);

        bus.error("first");
        bus.error("second");

        assert_eq!(recorder.events.lock().len(), 2);
    }

    #[test]
    fn test_concurrent_success_announces_once() {
        let recorder = Arc::new(Recorder::default());
        let bus = Arc::new(bus_with(vec![recorder.clone()]));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || bus.success())
            })
            .collect();
        let announced = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|first| *first)
            .count();

        assert_eq!(announced, 1);
        assert_eq!(recorder.events.lock().len(), 1);
    }

    #[test]
    fn test_silent_bus() {
        let bus = NotificationBus::silent();
        assert_eq!(bus.notify(&SiteEvent::Success), 0);
    }
}
