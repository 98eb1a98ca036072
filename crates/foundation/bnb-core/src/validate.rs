//! Price-range form validation
//!
//! Both fields are checked every time so the form can show every problem at once.

use crate::price::PriceRange;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Which form field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Min,
    Max,
}

impl PriceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Min => "min",
            PriceField::Max => "max",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            PriceField::Min => "Min price must be a number ≥ 0",
            PriceField::Max => "Max price must be a number ≥ 0",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: PriceField,
    pub message: String,
    /// Submitted text, trimmed
    pub value: String,
}

/// Every field that failed, in form order
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("invalid price range: {}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: PriceField) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn float_literal() -> &'static Regex {
    static FLOAT: OnceLock<Regex> = OnceLock::new();
    FLOAT.get_or_init(|| {
        Regex::new(r"^[+-]?[0-9]*(\.[0-9]*)?([eE][+-]?[0-9]+)?$").expect("float literal pattern")
    })
}

/// Parse one bound: a plain decimal float literal, non-negative.
///
/// Literals past `f64::MAX` such as `1e400` overflow to `+inf`, which is an open bound.
fn parse_bound(raw: &str) -> Option<f64> {
    if !float_literal().is_match(raw) {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan() && *v >= 0.0)
}

/// Validate the raw `min`/`max` query values.
///
/// Missing values are treated as empty text and fail. On success the parsed
/// range is ready for [`crate::filter_by_price`].
pub fn validate_price_range(
    raw_min: Option<&str>,
    raw_max: Option<&str>,
) -> Result<PriceRange, ValidationErrors> {
    let mut errors = Vec::new();
    let mut bounds = [0.0; 2];

    for (slot, (field, raw)) in [(PriceField::Min, raw_min), (PriceField::Max, raw_max)]
        .into_iter()
        .enumerate()
    {
        let value = raw.unwrap_or_default().trim();
        match parse_bound(value) {
            Some(v) => bounds[slot] = v,
            None => errors.push(ValidationError {
                field,
                message: field.message().to_string(),
                value: value.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(PriceRange::new(bounds[0], bounds[1]))
    } else {
        Err(ValidationErrors(errors))
    }
}
