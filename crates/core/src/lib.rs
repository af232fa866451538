//! `quotelink-core`: catalog domain building blocks.
//!
//! This crate contains **pure domain** types (no IO, no HTTP, no timers): the
//! manufacturer and product records returned by the catalog service, the search
//! query value object, and the mapping of a product onto a CRM quote record.

pub mod error;
pub mod manufacturer;
pub mod product;
pub mod query;
pub mod quote;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use manufacturer::Manufacturer;
pub use product::{Product, ProductPage, ProductSource};
pub use query::SearchQuery;
pub use quote::{QuoteFieldMapping, QuotePayload};
pub use value_object::ValueObject;
