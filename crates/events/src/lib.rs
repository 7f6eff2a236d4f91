//! Change notification mechanics (publish/subscribe).
//!
//! Domain crates own their event types; this crate only knows how to hand an
//! event to whoever registered interest in it.

pub mod bus;
pub mod event;
pub mod listeners;

pub use bus::Subscription;
pub use event::Event;
pub use listeners::{ListenerId, Listeners};
