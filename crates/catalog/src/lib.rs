//! `quotelink-catalog`
//!
//! **Responsibility:** talk to the remote catalog service.
//!
//! - [`http`]: a thin, stateless JSON-over-HTTP client (credentials, timeout,
//!   status and decode errors).
//! - [`api`]: the typed catalog API on top of it (manufacturer lookup and
//!   product search over the `{success, data, error}` envelope).

pub mod api;
pub mod config;
pub mod http;

pub use api::{CatalogApi, CatalogClient, CatalogError, ProductEndpoint};
pub use config::{CatalogConfig, Endpoints};
pub use http::{HttpClient, HttpError, QueryParams};
