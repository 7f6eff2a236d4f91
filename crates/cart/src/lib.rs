//! Shopping cart state.
//!
//! [`CartStore`] is the single authority for cart contents. Totals are derived
//! from the line items on every read; every successful mutation is announced to
//! subscribers as a [`CartChange`].

pub mod change;
pub mod handle;
pub mod line;
pub mod snapshot;
pub mod store;

pub use change::CartChange;
pub use handle::CartHandle;
pub use line::CartLine;
pub use snapshot::{CartSnapshot, SnapshotLine};
pub use store::CartStore;
