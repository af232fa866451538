//! Mapping of a selected product onto the CRM quote record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::product::Product;

/// Source field → CRM target field table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteFieldMapping {
    pub manufacturer_part_number: String,
    pub part_description: String,
    pub msrp: String,
    pub manufacturer_name: String,
}

impl Default for QuoteFieldMapping {
    fn default() -> Self {
        Self {
            manufacturer_part_number: "Product_Code".to_string(),
            part_description: "Product_Name".to_string(),
            msrp: "Unit_Price".to_string(),
            manufacturer_name: "Manufacturer".to_string(),
        }
    }
}

/// Flat target-field → value map handed to the CRM's record-population call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotePayload(BTreeMap<String, Value>);

impl QuotePayload {
    /// Build the payload for `product` through `mapping`.
    ///
    /// A missing MSRP is sent as `null` so the target field is still present.
    pub fn from_product(product: &Product, mapping: &QuoteFieldMapping) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            mapping.manufacturer_part_number.clone(),
            Value::String(product.part_number.clone()),
        );
        fields.insert(
            mapping.part_description.clone(),
            Value::String(product.description.clone()),
        );
        fields.insert(
            mapping.msrp.clone(),
            product
                .msrp
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
        fields.insert(
            mapping.manufacturer_name.clone(),
            Value::String(product.manufacturer_name.clone()),
        );
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductSource;
    use serde_json::json;

    fn widget() -> Product {
        Product {
            part_number: "X1".to_string(),
            description: "Widget".to_string(),
            manufacturer_name: "Acme".to_string(),
            msrp: Some(9.99),
            contract_price: Some(7.5),
            source: ProductSource::Catalog,
        }
    }

    #[test]
    fn maps_fields_through_default_table() {
        let payload = QuotePayload::from_product(&widget(), &QuoteFieldMapping::default());

        assert_eq!(payload.fields().count(), 4);
        assert_eq!(payload.get("Product_Code"), Some(&json!("X1")));
        assert_eq!(payload.get("Product_Name"), Some(&json!("Widget")));
        assert_eq!(payload.get("Unit_Price"), Some(&json!(9.99)));
        assert_eq!(payload.get("Manufacturer"), Some(&json!("Acme")));
        // Contract price is not part of the quote mapping.
        assert!(payload.fields().all(|(_, v)| v != &json!(7.5)));
    }

    #[test]
    fn missing_msrp_is_null() {
        let mut product = widget();
        product.msrp = None;
        let payload = QuotePayload::from_product(&product, &QuoteFieldMapping::default());
        assert_eq!(payload.get("Unit_Price"), Some(&Value::Null));
    }

    #[test]
    fn custom_mapping_is_honoured() {
        let mapping = QuoteFieldMapping {
            manufacturer_part_number: "SKU".to_string(),
            ..QuoteFieldMapping::default()
        };
        let payload = QuotePayload::from_product(&widget(), &mapping);
        assert_eq!(payload.get("SKU"), Some(&json!("X1")));
        assert!(payload.get("Product_Code").is_none());
        assert_eq!(payload.to_json()["SKU"], json!("X1"));
    }
}
