//! Catalog service location and credentials.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub manufacturer_lookup: String,
    pub product_search: String,
    pub hybrid_lookup: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            manufacturer_lookup: "/functions/v1/manufacturer-lookup".to_string(),
            product_search: "/functions/v1/product-search".to_string(),
            hybrid_lookup: "/functions/v1/hybrid-product-lookup".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Static key, sent both as `apikey` and as the bearer token.
    pub api_key: String,
    pub timeout_ms: u64,
    pub endpoints: Endpoints,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: Endpoints::default(),
        }
    }
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
