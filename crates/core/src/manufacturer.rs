use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::value_object::ValueObject;

/// A named vendor with the number of products the catalog holds for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    #[serde(rename = "manufacturer_name")]
    pub name: String,
    #[serde(rename = "product_count", default, deserialize_with = "deserialize_count")]
    pub product_count: u64,
}

/// Counts arrive as integers, floats or numeric strings. Anything that is not
/// a non-negative number counts as zero rather than failing the whole list.
fn deserialize_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_count)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole_count),
        _ => None,
    };
    Ok(parsed.unwrap_or(0))
}

fn whole_count(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0).then(|| n.trunc() as u64)
}

impl Manufacturer {
    pub fn new(name: impl Into<String>, product_count: u64) -> Self {
        Self {
            name: name.into(),
            product_count,
        }
    }
}

impl ValueObject for Manufacturer {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wire_names() {
        let m: Manufacturer =
            serde_json::from_value(json!({"manufacturer_name": "Acme", "product_count": 3}))
                .unwrap();
        assert_eq!(m, Manufacturer::new("Acme", 3));
    }

    #[test]
    fn missing_count_defaults_to_zero() {
        let m: Manufacturer =
            serde_json::from_value(json!({"manufacturer_name": "Bolt Co"})).unwrap();
        assert_eq!(m.product_count, 0);
    }

    #[test]
    fn odd_counts_decode_leniently() {
        let decode = |count: Value| -> u64 {
            serde_json::from_value::<Manufacturer>(
                json!({"manufacturer_name": "Acme", "product_count": count}),
            )
            .unwrap()
            .product_count
        };
        assert_eq!(decode(json!(null)), 0);
        assert_eq!(decode(json!(3.0)), 3);
        assert_eq!(decode(json!("12")), 12);
        assert_eq!(decode(json!(-1)), 0);
        assert_eq!(decode(json!("many")), 0);
    }

    #[test]
    fn list_with_null_count_still_decodes() {
        let list: Vec<Manufacturer> = serde_json::from_value(json!([
            {"manufacturer_name": "Acme", "product_count": 3},
            {"manufacturer_name": "Bolt Co", "product_count": null}
        ]))
        .unwrap();
        assert_eq!(list, vec![Manufacturer::new("Acme", 3), Manufacturer::new("Bolt Co", 0)]);
    }
}
