use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::value_object::ValueObject;

/// Where a catalog line item came from.
///
/// The hybrid lookup blends the product catalog with products already known
/// to the CRM; anything not tagged as catalog is treated as CRM-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSource {
    Catalog,
    CrmLocal,
}

impl ProductSource {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("catalog") | Some("supabase") => ProductSource::Catalog,
            _ => ProductSource::CrmLocal,
        }
    }

    /// Human-readable origin label.
    pub fn label(&self) -> &'static str {
        match self {
            ProductSource::Catalog => "Product Catalog",
            ProductSource::CrmLocal => "Local CRM",
        }
    }
}

impl Default for ProductSource {
    fn default() -> Self {
        ProductSource::CrmLocal
    }
}

impl<'de> Deserialize<'de> for ProductSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(ProductSource::from_wire(raw.as_deref()))
    }
}

/// A catalog line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "manufacturer_part_number")]
    pub part_number: String,
    #[serde(rename = "part_description", default)]
    pub description: String,
    #[serde(default)]
    pub manufacturer_name: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub msrp: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub contract_price: Option<f64>,
    #[serde(default)]
    pub source: ProductSource,
}

impl ValueObject for Product {}

/// Prices arrive either as JSON numbers or as numeric strings (`"9.99"`).
/// Anything else, including negative amounts, is treated as "no price".
fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|p| p.is_finite() && *p >= 0.0))
}

/// One page of product search results plus the display-only extras the
/// catalog sends alongside it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ProductPageWire")]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total matches across all sources (may exceed `products.len()`).
    pub total_available: Option<u64>,
    /// Search term as echoed back by the service.
    pub search_term: Option<String>,
}

impl ProductPage {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            total_available: None,
            search_term: None,
        }
    }

    pub fn contains(&self, product: &Product) -> bool {
        self.products.iter().any(|p| p == product)
    }
}

#[derive(Deserialize)]
struct ProductPageWire {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    source_counts: Option<SourceCounts>,
    #[serde(default)]
    query_info: Option<QueryInfo>,
}

#[derive(Deserialize)]
struct SourceCounts {
    #[serde(default)]
    total_available: Option<u64>,
}

#[derive(Deserialize)]
struct QueryInfo {
    #[serde(default)]
    search_term: Option<String>,
}

impl From<ProductPageWire> for ProductPage {
    fn from(wire: ProductPageWire) -> Self {
        Self {
            products: wire.products,
            total_available: wire.source_counts.and_then(|c| c.total_available),
            search_term: wire
                .query_info
                .and_then(|q| q.search_term)
                .filter(|t| !t.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_catalog_record() {
        let p: Product = serde_json::from_value(json!({
            "manufacturer_part_number": "X1",
            "part_description": "Widget",
            "manufacturer_name": "Acme",
            "msrp": 9.99,
            "source": "catalog"
        }))
        .unwrap();

        assert_eq!(p.part_number, "X1");
        assert_eq!(p.description, "Widget");
        assert_eq!(p.manufacturer_name, "Acme");
        assert_eq!(p.msrp, Some(9.99));
        assert_eq!(p.contract_price, None);
        assert_eq!(p.source, ProductSource::Catalog);
    }

    #[test]
    fn string_prices_are_parsed() {
        let p: Product = serde_json::from_value(json!({
            "manufacturer_part_number": "X2",
            "msrp": "12.50",
            "contract_price": "n/a",
        }))
        .unwrap();
        assert_eq!(p.msrp, Some(12.5));
        assert_eq!(p.contract_price, None);
    }

    #[test]
    fn negative_price_is_absent() {
        let p: Product = serde_json::from_value(json!({
            "manufacturer_part_number": "X3",
            "msrp": -4.0,
        }))
        .unwrap();
        assert_eq!(p.msrp, None);
    }

    #[test]
    fn source_mapping() {
        assert_eq!(ProductSource::from_wire(Some("supabase")), ProductSource::Catalog);
        assert_eq!(ProductSource::from_wire(Some("catalog")), ProductSource::Catalog);
        assert_eq!(ProductSource::from_wire(Some("zoho")), ProductSource::CrmLocal);
        assert_eq!(ProductSource::from_wire(None), ProductSource::CrmLocal);

        let p: Product = serde_json::from_value(json!({
            "manufacturer_part_number": "X4",
            "source": null,
        }))
        .unwrap();
        assert_eq!(p.source, ProductSource::CrmLocal);
    }

    #[test]
    fn page_extracts_display_extras() {
        let page: ProductPage = serde_json::from_value(json!({
            "products": [{"manufacturer_part_number": "X1"}],
            "source_counts": {"total_available": 40},
            "query_info": {"search_term": "wid"}
        }))
        .unwrap();

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total_available, Some(40));
        assert_eq!(page.search_term.as_deref(), Some("wid"));
    }

    #[test]
    fn page_without_products_is_empty() {
        let page: ProductPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.products.is_empty());
        assert_eq!(page.total_available, None);
        assert_eq!(page.search_term, None);
    }
}
