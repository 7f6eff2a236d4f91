//! Where products come from.
//!
//! [`CatalogSource`] is fallible on purpose even though the built-in catalog is
//! not: a file- or network-backed source can fail, and consumers are expected
//! to degrade to an empty catalog (see [`load_or_empty`]) rather than abort.

use std::collections::HashSet;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use storefront_core::{DomainError, Money, ProductId};

use crate::product::Product;

/// Supplies the ordered list of purchasable products.
pub trait CatalogSource {
    type Error: core::fmt::Display;

    /// Products in display order. Must be finite and stable between calls.
    fn list(&self) -> Result<Vec<Arc<Product>>, Self::Error>;
}

/// Read a catalog, treating failure as "no products".
pub fn load_or_empty<S: CatalogSource + ?Sized>(source: &S) -> Vec<Arc<Product>> {
    match source.list() {
        Ok(products) => {
            tracing::info!(count = products.len(), "catalog loaded");
            products
        }
        Err(err) => {
            tracing::warn!(error = %err, "catalog unavailable; continuing with no products");
            Vec::new()
        }
    }
}

/// In-memory catalog fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Arc<Product>>,
}

impl StaticCatalog {
    /// Build a catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id_typed().clone()) {
                return Err(DomainError::conflict(format!(
                    "duplicate product id in catalog: {}",
                    product.id_typed()
                )));
            }
        }

        Ok(Self {
            products: products.into_iter().map(Arc::new).collect(),
        })
    }

    /// The built-in demo catalog.
    pub fn seed() -> Self {
        let mut products = Vec::with_capacity(SEED.len());
        for (id, title, description, cents, image_url) in SEED {
            let product = ProductId::new(*id).and_then(|id| {
                Product::new(id, *title, *description, Money::from_minor_units(*cents), *image_url)
            });
            match product {
                Ok(product) => products.push(Arc::new(product)),
                Err(err) => tracing::warn!(id = *id, error = %err, "skipping invalid seed product"),
            }
        }
        Self { products }
    }

    pub fn find(&self, id: &ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogSource for StaticCatalog {
    type Error = Infallible;

    fn list(&self) -> Result<Vec<Arc<Product>>, Self::Error> {
        Ok(self.products.clone())
    }
}

const SEED: &[(&str, &str, &str, u32, &str)] = &[
    (
        "p1",
        "Red Shirt",
        "A red shirt - it is pretty red!",
        2999,
        "https://cdn.pixabay.com/photo/2016/10/02/22/17/red-t-shirt-1710578_1280.jpg",
    ),
    (
        "p2",
        "Trousers",
        "A nice pair of trousers.",
        5999,
        "https://upload.wikimedia.org/wikipedia/commons/thumb/e/e8/Trousers%2C_dress_%28AM_1960.022-8%29.jpg/512px-Trousers%2C_dress_%28AM_1960.022-8%29.jpg",
    ),
    (
        "p3",
        "Yellow Scarf",
        "Warm and cozy - exactly what you need for the winter.",
        1999,
        "https://live.staticflickr.com/4043/4438260868_cc79b3369d_z.jpg",
    ),
    (
        "p4",
        "A Pan",
        "Prepare any meal you want.",
        4999,
        "https://upload.wikimedia.org/wikipedia/commons/thumb/1/14/Cast-Iron-Pan.jpg/1024px-Cast-Iron-Pan.jpg",
    ),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

/// TOML-backed catalog, re-read on every `list()`.
///
/// ```toml
/// [[products]]
/// id = "p1"
/// title = "Red Shirt"
/// description = "A red shirt"
/// price = "29.99"
/// image_url = "https://example.com/shirt.jpg"
/// ```
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<StaticCatalog, CatalogError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        let file: CatalogFile = toml::from_str(&contents).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })?;

        StaticCatalog::new(file.products).map_err(|source| CatalogError::Invalid {
            path: self.path.clone(),
            source,
        })
    }
}

impl CatalogSource for FileCatalog {
    type Error = CatalogError;

    fn list(&self) -> Result<Vec<Arc<Product>>, Self::Error> {
        Ok(self.load()?.products)
    }
}
