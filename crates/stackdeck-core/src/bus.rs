//! Sliding-event bus: fans drag/slide events out to independent listeners.
//!
//! Design:
//! - One bus per deck, explicitly constructed and passed down. No global.
//! - [`subscribe`](SlidingEventBus::subscribe) hands back a [`Subscription`]
//!   token; dropping the token unsubscribes. Lifetime is explicit instead of
//!   relying on weak-reference pruning.
//! - Delivery is synchronous and in registration order, so per-publisher
//!   FIFO holds for every subscriber.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::SlidingEvent;

type Listener = Arc<dyn Fn(&SlidingEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct SlidingEventBus {
    inner: Arc<Mutex<BusInner>>,
    next_id: Arc<AtomicU64>,
}

impl SlidingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays active until the returned token drops.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SlidingEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .lock()
            .expect("event bus lock poisoned")
            .listeners
            .push((id, Arc::new(listener)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live subscriber, in subscription order.
    ///
    /// Listeners run outside the bus lock, so a listener may subscribe or
    /// drop tokens without deadlocking.
    pub fn publish(&self, event: SlidingEvent) {
        let snapshot: Vec<Listener> = {
            let inner = self.inner.lock().expect("event bus lock poisoned");
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in snapshot {
            listener(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .expect("event bus lock poisoned")
            .listeners
            .len()
    }
}

/// Disposable subscription token. Dropping it removes the listener.
pub struct Subscription {
    id: u64,
    bus: Weak<Mutex<BusInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade()
            && let Ok(mut inner) = inner.lock()
        {
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
