//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. `Money` is the main value object of the storefront:
///
/// ```ignore
/// let a = Money::parse("19.99")?;
/// let b = Money::parse("19.99")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
