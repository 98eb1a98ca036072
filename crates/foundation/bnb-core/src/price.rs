//! Price text normalization and the inclusive price range

use serde::{Deserialize, Serialize};

/// Strip everything except digits, `.` and `-`.
///
/// `"$1,060.50 "` becomes `"1060.50"`.
pub fn normalize_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Normalize, then parse the longest leading float.
///
/// Trailing junk after the number is ignored (`"5-10"` is `5`). Returns `None`
/// when no digits lead the normalized text.
pub fn parse_price(raw: &str) -> Option<f64> {
    leading_float(&normalize_price(raw))
}

fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Validated, inclusive price bounds.
///
/// Built by [`crate::validate_price_range`]; `min > max` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_currency() {
        assert_eq!(normalize_price("$1,060.50 "), "1060.50");
        assert_eq!(normalize_price("N/A"), "");
        assert_eq!(normalize_price("-$5"), "-5");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$150.00"), Some(150.0));
        assert_eq!(parse_price("$1,234"), Some(1234.0));
        assert_eq!(parse_price("$966 "), Some(966.0));
        assert_eq!(parse_price("-$5"), Some(-5.0));
        assert_eq!(parse_price(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_price_takes_leading_number() {
        assert_eq!(parse_price("$5-10"), Some(5.0));
        assert_eq!(parse_price("1.2.3"), Some(1.2));
    }

    #[test]
    fn test_parse_price_unparsable() {
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("."), None);
        assert_eq!(parse_price("--5"), None);
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = PriceRange::new(100.0, 200.0);
        assert!(range.contains(100.0));
        assert!(range.contains(200.0));
        assert!(range.contains(150.0));
        assert!(!range.contains(99.99));
        assert!(!range.contains(200.01));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = PriceRange::new(200.0, 100.0);
        assert!(!range.contains(150.0));
    }
}
