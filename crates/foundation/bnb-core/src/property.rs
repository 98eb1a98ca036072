//! Property records as they appear in the Airbnb dataset JSON

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Dataset identifier. The JSON carries either numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyId {
    Number(Number),
    Text(String),
}

impl PropertyId {
    /// Numeric view of the id, if it has one.
    ///
    /// Text ids count as numeric when their trimmed form parses as a finite float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyId::Number(n) => n.as_f64(),
            PropertyId::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return None;
                }
                t.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }

    /// Loose equality: numeric compare when both sides are numeric, exact text compare otherwise.
    ///
    /// `5`, `"5"` and `"5.0"` are all equal. `"abc"` only equals `"abc"`.
    pub fn loosely_eq(&self, other: &PropertyId) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    /// Empty or whitespace-only text, i.e. no id was given
    pub fn is_blank(&self) -> bool {
        matches!(self, PropertyId::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Number(n) => write!(f, "{}", n),
            PropertyId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyId {
    fn from(s: &str) -> Self {
        PropertyId::Text(s.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(s: String) -> Self {
        PropertyId::Text(s)
    }
}

impl From<i64> for PropertyId {
    fn from(n: i64) -> Self {
        PropertyId::Number(n.into())
    }
}

impl From<u64> for PropertyId {
    fn from(n: u64) -> Self {
        PropertyId::Number(n.into())
    }
}

/// One listing.
///
/// Only the fields the queries and views read are typed. Everything else in
/// the record is carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PropertyId>,

    #[serde(
        rename = "NAME",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Currency-formatted text such as `"$1,060 "`
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(
        rename = "service fee",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_fee: Option<String>,

    #[serde(
        rename = "host name",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub host_name: Option<String>,

    #[serde(
        rename = "neighbourhood group",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub neighbourhood_group: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,

    #[serde(
        rename = "room type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    pub fn new(id: impl Into<PropertyId>, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            price: Some(price.into()),
            ..Default::default()
        }
    }

    pub fn service_fee(mut self, fee: impl Into<String>) -> Self {
        self.service_fee = Some(fee.into());
        self
    }

    /// Normalized price, or `None` when absent or unparsable
    pub fn price_value(&self) -> Option<f64> {
        self.price.as_deref().and_then(crate::price::parse_price)
    }
}

/// Accept strings, numbers and booleans as text; `null` is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_dataset_record() {
        let raw = json!({
            "id": 1001254,
            "NAME": "Clean & quiet apt home by the park",
            "host name": "Madaline",
            "neighbourhood group": "Brooklyn",
            "neighbourhood": "Kensington",
            "room type": "Private room",
            "price": "$966 ",
            "service fee": "$193 ",
            "minimum nights": 10,
            "Construction year": 2020
        });

        let p: Property = serde_json::from_value(raw).unwrap();
        assert_eq!(p.id, Some(PropertyId::from(1001254u64)));
        assert_eq!(p.name.as_deref(), Some("Clean & quiet apt home by the park"));
        assert_eq!(p.host_name.as_deref(), Some("Madaline"));
        assert_eq!(p.room_type.as_deref(), Some("Private room"));
        assert_eq!(p.price_value(), Some(966.0));
        assert_eq!(p.extra.get("minimum nights"), Some(&json!(10)));
        assert!(!p.extra.contains_key("NAME"));
    }

    #[test]
    fn test_decode_lenient_fields() {
        let raw = json!({ "id": "abc", "NAME": 1234, "price": null });
        let p: Property = serde_json::from_value(raw).unwrap();

        assert_eq!(p.id, Some(PropertyId::Text("abc".into())));
        assert_eq!(p.name.as_deref(), Some("1234"));
        assert_eq!(p.price, None);
        assert_eq!(p.service_fee, None);
    }

    #[test]
    fn test_missing_id_is_none() {
        let p: Property = serde_json::from_value(json!({ "NAME": "No id" })).unwrap();
        assert!(p.id.is_none());
    }

    #[test]
    fn test_loose_equality_number_and_text() {
        let five = PropertyId::from(5i64);
        assert!(five.loosely_eq(&PropertyId::from("5")));
        assert!(PropertyId::from("5").loosely_eq(&five));
        assert!(five.loosely_eq(&PropertyId::from(" 5 ")));
        assert!(five.loosely_eq(&PropertyId::from("5.0")));
        assert!(!five.loosely_eq(&PropertyId::from("6")));
    }

    #[test]
    fn test_loose_equality_falls_back_to_text() {
        let id = PropertyId::from("abc");
        assert!(id.loosely_eq(&PropertyId::from("abc")));
        assert!(!id.loosely_eq(&PropertyId::from("ABC")));
        assert!(!PropertyId::from(5i64).loosely_eq(&PropertyId::from("five")));
        assert!(!PropertyId::from("NaN").loosely_eq(&PropertyId::from("nan")));
    }

    #[test]
    fn test_blank_id() {
        assert!(PropertyId::from("").is_blank());
        assert!(PropertyId::from("  ").is_blank());
        assert!(!PropertyId::from("0").is_blank());
        assert!(!PropertyId::from(0i64).is_blank());
    }

    #[test]
    fn test_roundtrip_keeps_original_keys() {
        let raw = json!({ "id": 7, "NAME": "Loft", "price": "$100", "license": "x" });
        let p: Property = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&p).unwrap(), raw);
    }
}
