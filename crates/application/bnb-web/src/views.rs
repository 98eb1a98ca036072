//! Display-ready rows built from property records

use bnb_core::Property;
use chrono::Datelike;
use serde_json::Value;

/// Row style for listings without a service fee
pub const MISSING_FEE_STYLE: &str = "background-color: lightblue;";

/// Service fee as shown in the cleaned table: blank becomes `"0"`.
pub fn service_fee_label(fee: Option<&str>) -> String {
    match fee {
        Some(fee) if !fee.trim().is_empty() => fee.to_string(),
        _ => "0".to_string(),
    }
}

/// Inline style for a row, highlighting blank service fees
pub fn fee_highlight(fee: Option<&str>) -> &'static str {
    match fee {
        Some(fee) if !fee.trim().is_empty() => "",
        _ => MISSING_FEE_STYLE,
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Link to the detail page for a listing found by id
pub fn id_href(id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("/search/property/result?id={}", encoded)
}

/// One extra record field (label, value)
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

/// A property flattened to strings for templates
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyView {
    pub id: String,
    pub name: String,
    pub host_name: String,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub room_type: String,
    pub price: String,
    pub service_fee: String,
    pub fee_label: String,
    pub fee_style: &'static str,
    /// Detail page link; empty when the record has neither position nor id
    pub href: String,
    pub details: Vec<Field>,
}

impl PropertyView {
    /// View of a record at a known position in the collection
    pub fn at(position: usize, property: &Property) -> Self {
        let mut view = Self::from(property);
        view.href = format!("/data/{}", position);
        view
    }
}

impl From<&Property> for PropertyView {
    fn from(p: &Property) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let id = p.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        let href = if id.is_empty() { String::new() } else { id_href(&id) };

        Self {
            name: text(&p.name),
            host_name: text(&p.host_name),
            neighbourhood_group: text(&p.neighbourhood_group),
            neighbourhood: text(&p.neighbourhood),
            room_type: text(&p.room_type),
            price: text(&p.price),
            service_fee: text(&p.service_fee),
            fee_label: service_fee_label(p.service_fee.as_deref()),
            fee_style: fee_highlight(p.service_fee.as_deref()),
            details: p
                .extra
                .iter()
                .map(|(label, value)| Field {
                    label: label.clone(),
                    value: display_value(value),
                })
                .collect(),
            href,
            id,
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rows for a whole collection, linked by position
pub fn positioned(collection: &[Property]) -> Vec<PropertyView> {
    collection
        .iter()
        .enumerate()
        .map(|(i, p)| PropertyView::at(i, p))
        .collect()
}

/// Rows for a query result, linked by id
pub fn listed(found: &[&Property]) -> Vec<PropertyView> {
    found.iter().map(|p| PropertyView::from(*p)).collect()
}
