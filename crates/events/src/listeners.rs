//! Synchronous listener registry.
//!
//! The publisher owns a [`Listeners`] value and calls [`Listeners::notify`] after
//! each state change. Every listener runs to completion, in registration order,
//! before `notify` returns. There is no global registry: whoever wants to be
//! told about changes needs a handle to the publisher.
//!
//! Listeners receive the event plus a read-only *context* (typically the
//! publisher itself), so they can look at derived state without holding their
//! own reference to it. A shared reference also means a listener cannot
//! re-enter the publisher's mutating API.

use std::collections::BTreeMap;
use std::sync::mpsc;

use crate::bus::Subscription;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Callback<E, C> = Box<dyn Fn(&E, &C)>;

pub struct Listeners<E, C: ?Sized> {
    next_id: u64,
    // Ids are allocated monotonically, so key order == registration order.
    callbacks: BTreeMap<ListenerId, Callback<E, C>>,
}

impl<E, C: ?Sized> Listeners<E, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It will be invoked for every subsequent event.
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&E, &C) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        tracing::trace!(listener = id.0, "listener subscribed");
        id
    }

    /// Remove a callback. Returns `false` if the id was unknown (or already removed).
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.callbacks.remove(&id).is_some();
        if removed {
            tracing::trace!(listener = id.0, "listener unsubscribed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invoke every registered callback, in registration order.
    pub fn notify(&self, event: &E, context: &C) {
        for callback in self.callbacks.values() {
            callback(event, context);
        }
    }
}

impl<E, C> Listeners<E, C>
where
    E: Clone + 'static,
    C: ?Sized,
{
    /// Register a listener that forwards a clone of each event into a channel.
    ///
    /// Returns the listener id (so the forwarder can be removed) and the
    /// receiving end.
    pub fn subscribe_channel(&mut self) -> (ListenerId, Subscription<E>) {
        let (tx, rx) = mpsc::channel();
        let id = self.subscribe(move |event: &E, _: &C| {
            // Receiver gone: nothing left to deliver to.
            let _ = tx.send(event.clone());
        });
        (id, Subscription::new(rx))
    }
}

impl<E, C: ?Sized> Default for Listeners<E, C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }
    }
}

impl<E, C: ?Sized> core::fmt::Debug for Listeners<E, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
