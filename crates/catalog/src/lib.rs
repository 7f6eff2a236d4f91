//! Product catalog.
//!
//! Products are built once, validated, wrapped in `Arc` and never mutated
//! afterwards. Everything downstream (cart lines, views) shares those `Arc`s.

pub mod product;
pub mod source;

pub use product::Product;
pub use source::{CatalogError, CatalogSource, FileCatalog, StaticCatalog, load_or_empty};
