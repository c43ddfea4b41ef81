//! Lifecycle notifications to connected observers.
//!
//! The gateway posts [`SiteEvent`]s through a [`NotificationBus`], which asks
//! an injected [`ObserverSource`] for the currently connected observers on
//! every event. [`ObserverHub`] is the built-in source backed by channels.

mod bus;
mod event;
mod hub;

pub use bus::{NotificationBus, NotifyError, Observer, ObserverSource};
pub use event::SiteEvent;
pub use hub::ObserverHub;
