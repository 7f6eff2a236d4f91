use serde::Serialize;

use storefront_core::{Money, ProductId};

use crate::store::CartStore;

/// Read-only, serializable picture of the cart for views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
    pub total_items: u64,
    pub total_price: Money,
    /// `total_price` rounded for display.
    pub display_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

impl CartSnapshot {
    pub fn of(store: &CartStore) -> Self {
        let lines = store
            .lines()
            .map(|line| SnapshotLine {
                product_id: line.product_id().clone(),
                title: line.product().title().to_string(),
                unit_price: line.product().price(),
                quantity: line.quantity(),
                line_total: line.line_total(),
            })
            .collect();
        let total_price = store.total_price();

        Self {
            lines,
            total_items: store.total_items(),
            total_price,
            display_total: total_price.display(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
