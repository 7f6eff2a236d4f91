//! Shared handle to the one cart of the process.
//!
//! The store is created once at startup and a clone of this handle is passed
//! to every component that reads or mutates the cart. Execution is
//! single-threaded, so the handle is an `Rc<RefCell<_>>` and is `!Send`.
//!
//! Listeners run while the store is mutably borrowed. Inside a listener, read
//! the cart through the `&CartStore` argument, not through a handle.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::store::CartStore;

#[derive(Debug, Clone, Default)]
pub struct CartHandle {
    inner: Rc<RefCell<CartStore>>,
}

impl CartHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access for reads.
    pub fn read(&self) -> Ref<'_, CartStore> {
        self.inner.borrow()
    }

    /// Exclusive access for mutations and (un)subscribing.
    pub fn write(&self) -> RefMut<'_, CartStore> {
        self.inner.borrow_mut()
    }

    /// Whether two handles point at the same store.
    pub fn same_store(&self, other: &CartHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storefront_catalog::Product;
    use storefront_core::{Money, ProductId};

    use super::*;

    #[test]
    fn clones_share_one_store() {
        let p = Arc::new(
            Product::new(ProductId::new("p").unwrap(), "P", "", Money::zero(), "").unwrap(),
        );
        let cart = CartHandle::new();
        let badge = cart.clone();

        cart.write().add(&p);

        assert!(cart.same_store(&badge));
        assert_eq!(badge.read().total_items(), 1);
        assert!(!cart.same_store(&CartHandle::new()));
    }
}
