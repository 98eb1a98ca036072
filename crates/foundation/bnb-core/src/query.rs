//! Query engine over a loaded property snapshot
//!
//! Each function is a single linear scan (or an index) over `collection`.
//! Results borrow from the snapshot and keep collection order.

use crate::price::PriceRange;
use crate::property::{Property, PropertyId};
use crate::{QueryError, Result};

/// The whole collection, unchanged
pub fn list_all(collection: &[Property]) -> &[Property] {
    collection
}

/// Property at a zero-based position given as raw request text.
///
/// Anything that is not a non-negative integer below `collection.len()` is
/// [`QueryError::InvalidIndex`].
pub fn get_by_position<'a>(collection: &'a [Property], index: &str) -> Result<&'a Property> {
    locate(collection, index).map(|(_, property)| property)
}

/// Like [`get_by_position`], also returning the parsed position.
pub fn locate<'a>(collection: &'a [Property], index: &str) -> Result<(usize, &'a Property)> {
    index
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|i| collection.get(i).map(|p| (i, p)))
        .ok_or(QueryError::InvalidIndex)
}

/// First property whose id loosely equals `id`.
///
/// A missing or blank id is [`QueryError::NotFound`], same as no match.
pub fn find_by_id<'a>(collection: &'a [Property], id: Option<&PropertyId>) -> Result<&'a Property> {
    let id = id.filter(|id| !id.is_blank()).ok_or(QueryError::NotFound)?;
    collection
        .iter()
        .find(|p| p.id.as_ref().is_some_and(|pid| pid.loosely_eq(id)))
        .ok_or(QueryError::NotFound)
}

/// Case-insensitive substring match on `name`.
///
/// A query that is empty after trimming is [`QueryError::EmptyQuery`]; no
/// matches is `Ok` with an empty vec.
pub fn search_by_name<'a>(collection: &'a [Property], query: &str) -> Result<Vec<&'a Property>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(QueryError::EmptyQuery);
    }

    Ok(collection
        .iter()
        .filter(|p| {
            p.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect())
}

/// Properties whose normalized price falls inside `range`, bounds included.
///
/// Records with a missing or unparsable price are skipped.
pub fn filter_by_price<'a>(collection: &'a [Property], range: &PriceRange) -> Vec<&'a Property> {
    collection
        .iter()
        .filter(|p| p.price_value().is_some_and(|price| range.contains(price)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_price_range;

    fn sample() -> Vec<Property> {
        vec![
            Property::new(5i64, "Cozy Villa", "$150.00"),
            Property::new("a-12", "Downtown Loft", "$99.99"),
            Property::new(7i64, "VILLA on the beach", "$250"),
            Property::new(8i64, "Garden Studio", "N/A"),
            Property::new("9", "Quiet Room", "$1,200"),
            Property {
                id: Some(PropertyId::from(10i64)),
                ..Default::default()
            },
        ]
    }

    fn ids(found: &[&Property]) -> Vec<String> {
        found
            .iter()
            .map(|p| p.id.as_ref().map(|id| id.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_list_all_keeps_order() {
        let c = sample();
        let all = list_all(&c);
        assert_eq!(all.len(), c.len());
        assert_eq!(all[0].name.as_deref(), Some("Cozy Villa"));
        assert_eq!(all[5].name, None);
    }

    #[test]
    fn test_get_by_position_valid() {
        let c = sample();
        for i in 0..c.len() {
            let p = get_by_position(&c, &i.to_string()).unwrap();
            assert_eq!(p, &c[i]);
        }
        assert_eq!(get_by_position(&c, " 2 ").unwrap(), &c[2]);
    }

    #[test]
    fn test_locate_returns_parsed_position() {
        let c = sample();
        let (position, p) = locate(&c, " 2 ").unwrap();
        assert_eq!(position, 2);
        assert_eq!(p, &c[2]);
        assert_eq!(locate(&c, "6"), Err(QueryError::InvalidIndex));
    }

    #[test]
    fn test_get_by_position_invalid() {
        let c = sample();
        for raw in ["-1", "6", "100", "abc", "", "1.5", "2x"] {
            assert_eq!(get_by_position(&c, raw), Err(QueryError::InvalidIndex), "{raw}");
        }
        assert_eq!(get_by_position(&[], "0"), Err(QueryError::InvalidIndex));
    }

    #[test]
    fn test_find_by_id_loose_equality() {
        let c = sample();
        let by_text = find_by_id(&c, Some(&PropertyId::from("5"))).unwrap();
        let by_number = find_by_id(&c, Some(&PropertyId::from(5i64))).unwrap();
        assert_eq!(by_text, by_number);
        assert_eq!(by_text.name.as_deref(), Some("Cozy Villa"));

        // string id in the data, numeric lookup
        let p = find_by_id(&c, Some(&PropertyId::from(9i64))).unwrap();
        assert_eq!(p.name.as_deref(), Some("Quiet Room"));
    }

    #[test]
    fn test_find_by_id_text_ids() {
        let c = sample();
        let p = find_by_id(&c, Some(&PropertyId::from("a-12"))).unwrap();
        assert_eq!(p.name.as_deref(), Some("Downtown Loft"));
        assert_eq!(
            find_by_id(&c, Some(&PropertyId::from("A-12"))),
            Err(QueryError::NotFound)
        );
    }

    #[test]
    fn test_find_by_id_returns_first_match() {
        let c = vec![
            Property::new(1i64, "First", "$1"),
            Property::new("1", "Second", "$2"),
        ];
        let p = find_by_id(&c, Some(&PropertyId::from("1"))).unwrap();
        assert_eq!(p.name.as_deref(), Some("First"));
    }

    #[test]
    fn test_find_by_id_not_found() {
        let c = sample();
        assert_eq!(find_by_id(&c, Some(&PropertyId::from("404"))), Err(QueryError::NotFound));
        assert_eq!(find_by_id(&c, None), Err(QueryError::NotFound));
        assert_eq!(find_by_id(&c, Some(&PropertyId::from("  "))), Err(QueryError::NotFound));
    }

    #[test]
    fn test_search_empty_query() {
        let c = sample();
        assert_eq!(search_by_name(&c, ""), Err(QueryError::EmptyQuery));
        assert_eq!(search_by_name(&c, "   "), Err(QueryError::EmptyQuery));
    }

    #[test]
    fn test_search_case_insensitive_in_order() {
        let c = sample();
        let found = search_by_name(&c, "villa").unwrap();
        assert_eq!(ids(&found), vec!["5", "7"]);

        let found = search_by_name(&c, "  ViLLa ").unwrap();
        assert_eq!(ids(&found), vec!["5", "7"]);
    }

    #[test]
    fn test_search_substring_anywhere() {
        let c = sample();
        let found = search_by_name(&c, "T").unwrap();
        assert_eq!(ids(&found), vec!["a-12", "7", "8", "9"]);
    }

    #[test]
    fn test_search_no_matches_is_empty() {
        let c = sample();
        assert!(search_by_name(&c, "castle").unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_price_inclusive() {
        let c = sample();
        let found = filter_by_price(&c, &PriceRange::new(100.0, 200.0));
        assert_eq!(ids(&found), vec!["5"]);

        let found = filter_by_price(&c, &PriceRange::new(99.99, 250.0));
        assert_eq!(ids(&found), vec!["5", "a-12", "7"]);
    }

    #[test]
    fn test_filter_by_price_skips_unparsable() {
        let c = sample();
        let found = filter_by_price(&c, &PriceRange::new(0.0, 10_000.0));
        assert_eq!(ids(&found), vec!["5", "a-12", "7", "9"]);
    }

    #[test]
    fn test_validate_then_filter() {
        let c = sample();
        let range = validate_price_range(Some("50"), Some("100")).unwrap();
        assert_eq!(range, PriceRange::new(50.0, 100.0));
        let found = filter_by_price(&c, &range);
        assert_eq!(ids(&found), vec!["a-12"]);
    }
}
