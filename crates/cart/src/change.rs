use serde::{Deserialize, Serialize};

use storefront_core::ProductId;
use storefront_events::Event;

/// Notification payload, published after the mutation has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartChange {
    /// A product was added; `quantity` is the resulting line quantity.
    Added { product_id: ProductId, quantity: u32 },
    /// One unit was taken off a line that still has `quantity` left.
    Decremented { product_id: ProductId, quantity: u32 },
    /// A line left the cart.
    Removed { product_id: ProductId },
    /// The cart was emptied. Published even when it already was.
    Cleared { lines_removed: usize },
}

impl CartChange {
    /// Product affected by the change, if it concerns a single line.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartChange::Added { product_id, .. }
            | CartChange::Decremented { product_id, .. }
            | CartChange::Removed { product_id } => Some(product_id),
            CartChange::Cleared { .. } => None,
        }
    }
}

impl Event for CartChange {
    fn event_type(&self) -> &'static str {
        match self {
            CartChange::Added { .. } => "cart.line.added",
            CartChange::Decremented { .. } => "cart.line.decremented",
            CartChange::Removed { .. } => "cart.line.removed",
            CartChange::Cleared { .. } => "cart.cleared",
        }
    }
}
