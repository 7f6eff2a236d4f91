//! Storefront application wiring: configuration and terminal views.
//!
//! One `CartHandle` is created at startup and handed to every component that
//! needs the cart; nothing looks the cart up globally.

pub mod config;
pub mod shell;

pub use config::{ConfigError, StorefrontConfig};
pub use shell::{Command, Outcome, ParseCommandError, Storefront};
