//! Named-channel publish/subscribe register.
//!
//! The bus knows nothing about rendering or input: it maps a channel key to an
//! ordered list of callbacks and delivers payloads to them synchronously, in
//! subscription order. It is the seam through which independent game modules
//! hook into the engine without knowing about each other.
//!
//! Delivery is isolated per callback. A subscriber that returns `Err` or
//! panics is logged and skipped; the remaining subscribers still receive the
//! payload and the publisher never sees the failure.
//!
//! All methods take `&self` so a subscriber may subscribe or publish from
//! inside a callback. Each publish delivers to the subscriber list as it was
//! when the publish began.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Error type subscribers may return; any error converts into it with `?`.
pub type SubscriberError = Box<dyn std::error::Error>;

/// Return type of every subscriber callback.
pub type SubscriberResult = Result<(), SubscriberError>;

/// Identifies one registration. Diagnostic only: there is no per-callback removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// The raw registration counter.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

type Callback<P> = Rc<RefCell<dyn FnMut(&P) -> SubscriberResult>>;

struct Subscriber<P: ?Sized> {
    id: SubscriptionId,
    callback: Callback<P>,
}

impl<P: ?Sized> Clone for Subscriber<P> {
    fn clone(&self) -> Self {
        Self { id: self.id, callback: Rc::clone(&self.callback) }
    }
}

/// Publish/subscribe register keyed by channel `K`, delivering payloads of type `P`.
pub struct EventBus<K, P: ?Sized> {
    channels: RefCell<HashMap<K, Vec<Subscriber<P>>>>,
    next_id: Cell<u64>,
}

impl<K, P: ?Sized> Default for EventBus<K, P> {
    fn default() -> Self {
        Self { channels: RefCell::new(HashMap::new()), next_id: Cell::new(0) }
    }
}

impl<K, P> EventBus<K, P>
where
    K: Copy + Eq + Hash + Debug,
    P: ?Sized + 'static,
{
    /// Create an empty bus with no channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `channel`. Never fails.
    ///
    /// Registering the same logic twice yields two independent deliveries.
    pub fn subscribe<F>(&self, channel: K, callback: F) -> SubscriptionId
    where
        F: FnMut(&P) -> SubscriberResult + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let callback: Callback<P> = Rc::new(RefCell::new(callback));
        self.channels
            .borrow_mut()
            .entry(channel)
            .or_default()
            .push(Subscriber { id, callback });
        id
    }

    /// Deliver `payload` to every subscriber of `channel`, in subscription order.
    ///
    /// Publishing to a channel nobody listens on is a no-op.
    pub fn publish(&self, channel: K, payload: &P) {
        let snapshot = match self.channels.borrow().get(&channel) {
            Some(subscribers) => subscribers.clone(),
            None => return,
        };

        for subscriber in &snapshot {
            // A callback that publishes to its own channel would re-enter itself.
            let Ok(mut callback) = subscriber.callback.try_borrow_mut() else {
                log::warn!(
                    "bus: skipping re-entrant delivery to subscriber {} on {channel:?}",
                    subscriber.id.0
                );
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| (&mut *callback)(payload))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    log::warn!("bus: subscriber {} on {channel:?} failed: {err}", subscriber.id.0);
                }
                Err(_) => {
                    log::error!("bus: subscriber {} on {channel:?} panicked", subscriber.id.0);
                }
            }
        }
    }

    /// Drop every subscriber on every channel.
    pub fn unsubscribe(&self) {
        let mut channels = self.channels.borrow_mut();
        let dropped: usize = channels.values().map(Vec::len).sum();
        channels.clear();
        log::debug!("bus: cleared {dropped} subscribers");
    }

    /// Number of subscribers currently registered on `channel`.
    #[must_use]
    pub fn subscriber_count(&self, channel: K) -> usize {
        self.channels.borrow().get(&channel).map_or(0, Vec::len)
    }

    /// Whether no channel has any subscriber.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.borrow().values().all(Vec::is_empty)
    }
}
