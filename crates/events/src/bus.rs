//! Pull-style subscriptions.
//!
//! Callback listeners (see [`crate::listeners`]) run inside the publisher's call
//! stack. Some consumers would rather collect changes and look at them later
//! (a test, a logging task, a view that redraws once per frame). A
//! [`Subscription`] is that: a listener that forwards every event into a
//! channel, plus the receiving end.
//!
//! ## Usage Pattern
//!
//! ```ignore
//! let (_, changes) = store.subscribe_channel();
//! store.add(&product);
//! for change in changes.drain() {
//!     redraw(&change);
//! }
//! ```
//!
//! ## Message Ordering
//!
//! Messages are received in publication order. Dropping the subscription does
//! not unregister the forwarding listener; it only turns it into a no-op.

use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every message published so far, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}
