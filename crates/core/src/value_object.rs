//! Value object trait: equality by value, not identity.
//!
//! Catalog records carry no identity of their own. A product is "the same
//! product" when every field matches, which is what selection checks rely on.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Manufacturers,
/// products and search queries are all value objects: the catalog replaces them
/// wholesale on every response and never mutates one in place.
///
/// ```ignore
/// let a = SearchQuery::new("Acme", "bolt")?;
/// let b = SearchQuery::new("Acme", "bolt")?;
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
