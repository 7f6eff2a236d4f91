use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult};

/// Where to ship an order. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl ShippingDetails {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// Trimmed copy of the details, or the first missing field.
    pub fn validated(&self) -> DomainResult<ShippingDetails> {
        let name = required("name", &self.name)?;
        let phone = required("phone", &self.phone)?;
        let address = required("address", &self.address)?;
        Ok(Self::new(name, phone, address))
    }
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
