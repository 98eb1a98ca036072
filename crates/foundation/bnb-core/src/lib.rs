//! # bnb-core
//!
//! Property model and the query engine behind every listing page.
//!
//! ```text
//! loader ──► Arc<[Property]> snapshot ──► query::* ──► views
//!                                  (pure, synchronous, no I/O)
//! ```
//!
//! Every query takes the current snapshot as an explicit `&[Property]`.
//! Nothing in this crate holds state between calls.

pub mod price;
pub mod property;
pub mod query;
pub mod validate;

pub use price::{normalize_price, parse_price, PriceRange};
pub use property::{Property, PropertyId};
pub use query::{filter_by_price, find_by_id, get_by_position, list_all, locate, search_by_name};
pub use validate::{validate_price_range, PriceField, ValidationError, ValidationErrors};

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Caller-visible query outcomes that are not a result set.
///
/// "No matches" for a name search or a price filter is an empty `Vec`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid index!")]
    InvalidIndex,

    #[error("Property ID not found!")]
    NotFound,

    #[error("Please enter a name.")]
    EmptyQuery,
}
