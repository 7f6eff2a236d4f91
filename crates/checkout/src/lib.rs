//! Mock checkout.
//!
//! Validates shipping details, waits out a simulated processing delay, then
//! captures the cart total and clears the cart.

pub mod flow;
pub mod shipping;

pub use flow::{CheckoutError, CheckoutFlow, OrderConfirmation};
pub use shipping::ShippingDetails;
