//! Widget configuration.
//!
//! Defaults carry the production constants; [`WidgetConfig::from_env`]
//! overrides the deployment-specific ones.

use std::time::Duration;

use quotelink_catalog::CatalogConfig;
use quotelink_core::QuoteFieldMapping;
use serde::{Deserialize, Serialize};

/// Fixed user-facing texts.
pub mod messages {
    pub const READY: &str = "Ready";
    pub const LOADING: &str = "Loading...";
    pub const SEARCHING: &str = "Searching...";
    pub const ERROR: &str = "Error";
    pub const ADDED_TO_QUOTE: &str = "Added to Quote";
    pub const API_ERROR: &str = "Unable to retrieve product data. Please try again.";
    pub const QUOTE_ERROR: &str = "Failed to add product to quote";
    pub const SELECT_PLACEHOLDER: &str = "Select a manufacturer...";
    pub const NO_PRODUCTS: &str = "No products found for this search";
    pub const SHOWING_ALL: &str = "Showing all products";
    pub const PRICE_ON_REQUEST: &str = "Price on request";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Search the hybrid (catalog + CRM) lookup instead of the catalog only.
    pub hybrid_search: bool,
    pub pricing_display: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            hybrid_search: true,
            pricing_display: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub catalog: CatalogConfig,
    pub default_page_size: u32,
    /// Effectively unbounded; the lookup returns every manufacturer.
    pub manufacturer_limit: u32,
    pub search_debounce_ms: u64,
    pub quote_revert_ms: u64,
    pub description_limit: usize,
    /// Substring of the parent host that identifies the CRM.
    pub host_marker: String,
    pub features: FeatureFlags,
    pub quote_fields: QuoteFieldMapping,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            default_page_size: 25,
            manufacturer_limit: 1000,
            search_debounce_ms: 300,
            quote_revert_ms: 2000,
            description_limit: 50,
            host_marker: "zoho".to_string(),
            features: FeatureFlags::default(),
            quote_fields: QuoteFieldMapping::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults overridden by `QUOTELINK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("QUOTELINK_API_URL") {
            config.catalog.base_url = url;
        }
        if let Some(key) = lookup("QUOTELINK_API_KEY") {
            config.catalog.api_key = key;
        }
        match lookup("QUOTELINK_TIMEOUT_MS").map(|v| v.parse::<u64>()) {
            Some(Ok(ms)) => config.catalog.timeout_ms = ms,
            Some(Err(e)) => tracing::warn!(error = %e, "ignoring invalid QUOTELINK_TIMEOUT_MS"),
            None => {}
        }
        if let Some(flag) = lookup("QUOTELINK_HYBRID_SEARCH") {
            config.features.hybrid_search = !matches!(flag.as_str(), "0" | "false" | "off");
        }
        if let Some(marker) = lookup("QUOTELINK_HOST_MARKER") {
            config.host_marker = marker;
        }

        config
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn quote_revert(&self) -> Duration {
        Duration::from_millis(self.quote_revert_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_production_constants() {
        let c = WidgetConfig::default();
        assert_eq!(c.default_page_size, 25);
        assert_eq!(c.manufacturer_limit, 1000);
        assert_eq!(c.search_debounce(), Duration::from_millis(300));
        assert_eq!(c.catalog.timeout(), Duration::from_millis(10_000));
        assert_eq!(c.quote_revert(), Duration::from_millis(2000));
        assert!(c.features.hybrid_search);
        assert_eq!(c.quote_fields.msrp, "Unit_Price");
    }

    #[test]
    fn environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QUOTELINK_API_URL", "https://catalog.internal"),
            ("QUOTELINK_API_KEY", "secret"),
            ("QUOTELINK_TIMEOUT_MS", "2500"),
            ("QUOTELINK_HYBRID_SEARCH", "false"),
        ]
        .into_iter()
        .collect();

        let c = WidgetConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.catalog.base_url, "https://catalog.internal");
        assert_eq!(c.catalog.api_key, "secret");
        assert_eq!(c.catalog.timeout_ms, 2500);
        assert!(!c.features.hybrid_search);
        assert_eq!(c.host_marker, "zoho");
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let c = WidgetConfig::from_lookup(|k| {
            (k == "QUOTELINK_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert_eq!(c.catalog.timeout_ms, 10_000);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = WidgetConfig::from_json(
            r#"{"default_page_size": 10, "features": {"hybrid_search": false}}"#,
        )
        .unwrap();
        assert_eq!(c.default_page_size, 10);
        assert!(!c.features.hybrid_search);
        assert!(c.features.pricing_display);
        assert_eq!(c.search_debounce_ms, 300);
    }
}
