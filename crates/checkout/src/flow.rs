use std::cell::Cell;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use storefront_cart::CartHandle;
use storefront_core::{DomainError, Money};

use crate::shipping::ShippingDetails;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A placement is already waiting on the processing delay.
    #[error("an order is already being placed")]
    InProgress,

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("the cart is empty")]
    EmptyCart,
}

/// Outcome of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub customer_name: String,
    /// Cart total captured immediately before the cart was cleared.
    pub total: Money,
    pub item_count: u64,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    pub fn message(&self, currency_symbol: &str) -> String {
        format!(
            "Thank you, {}! Your order of {}{} has been placed.",
            self.customer_name,
            currency_symbol,
            self.total.display()
        )
    }
}

/// Places orders against the shared cart.
///
/// At most one placement is in flight at a time. The cart is cleared exactly
/// once per successful placement, after its total has been read.
#[derive(Debug)]
pub struct CheckoutFlow {
    cart: CartHandle,
    processing_delay: Duration,
    in_progress: Cell<bool>,
}

impl CheckoutFlow {
    pub fn new(cart: CartHandle, processing_delay: Duration) -> Self {
        Self {
            cart,
            processing_delay,
            in_progress: Cell::new(false),
        }
    }

    /// Whether a placement is currently suspended on the processing delay.
    /// Views use this to disable the submit action.
    pub fn in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub async fn place_order(
        &self,
        details: ShippingDetails,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.in_progress.get() {
            tracing::warn!("checkout submitted while another placement is in progress");
            return Err(CheckoutError::InProgress);
        }

        let details = details.validated()?;
        if self.cart.read().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let _busy = InProgress::engage(&self.in_progress);
        tracing::info!(
            delay_ms = u64::try_from(self.processing_delay.as_millis()).unwrap_or(u64::MAX),
            "placing order"
        );

        // No cart borrow may be held across this await.
        tokio::time::sleep(self.processing_delay).await;

        let (total, item_count) = {
            let mut cart = self.cart.write();
            let total = cart.total_price();
            let item_count = cart.total_items();
            cart.clear();
            (total, item_count)
        };

        let confirmation = OrderConfirmation {
            order_id: Uuid::now_v7(),
            customer_name: details.name,
            total,
            item_count,
            placed_at: Utc::now(),
        };
        tracing::info!(
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            item_count,
            "order placed"
        );
        Ok(confirmation)
    }
}

/// Holds the in-progress flag for the lifetime of a placement, including when
/// the placement future is dropped mid-delay.
struct InProgress<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InProgress<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
