use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity, Money, ProductId};

/// Immutable catalog entry.
///
/// Equality and hashing look at `id` only: two products with the same id but
/// different titles or prices are the same product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: ProductId,
    title: String,
    description: String,
    price: Money,
    image_url: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        image_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "product {id}: title cannot be empty"
            )));
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            price,
            image_url: image_url.into(),
        })
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Opaque reference to the product image. Never fetched or validated here.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Wire shape of a product (catalog files, snapshots).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    id: ProductId,
    title: String,
    #[serde(default)]
    description: String,
    price: Money,
    #[serde(default)]
    image_url: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(r.id, r.title, r.description, r.price, r.image_url)
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
        }
    }
}
