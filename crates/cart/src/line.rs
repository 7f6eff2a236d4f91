use std::sync::Arc;

use storefront_catalog::Product;
use storefront_core::{Money, ProductId};

/// One distinct product in the cart and how many of it.
///
/// Only [`crate::CartStore`] creates or changes lines, so `quantity` is always
/// at least 1: a line that would drop to zero is removed instead.
#[derive(Debug, Clone)]
pub struct CartLine {
    product: Arc<Product>,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(product: Arc<Product>) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Decrement by one. Callers must remove the line instead when `quantity == 1`.
    pub(crate) fn decrement(&mut self) {
        debug_assert!(self.quantity > 1, "cart line quantity would reach zero");
        self.quantity -= 1;
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        self.product.id_typed()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, unrounded.
    pub fn line_total(&self) -> Money {
        self.product.price().times(self.quantity)
    }
}

/// Lines are equal when they refer to the same product id with the same quantity.
impl PartialEq for CartLine {
    fn eq(&self, other: &Self) -> bool {
        self.product_id() == other.product_id() && self.quantity == other.quantity
    }
}

impl Eq for CartLine {}
