//! # bnb-dataset
//!
//! Loads the Airbnb property dataset and holds the current snapshot.
//!
//! ```text
//! PropertySource::load() ──► Vec<Property> ──► DatasetStore (swap Arc) ──► Snapshot
//!   RemoteSource   index.json + parts over HTTP
//!   BundledSource  JSON file or index.json directory on disk
//!   MemorySource   fixed records
//! ```
//!
//! Readers hold an `Arc<[Property]>` snapshot for the life of a request. A
//! reload never mutates a snapshot; it replaces the store's pointer, so two
//! overlapping requests may see different loads (last load wins).

pub mod source;
pub mod store;

pub use source::{source_for, BundledSource, Index, MemorySource, PropertySource, RemoteSource};
pub use store::{DatasetStore, LoadStats, Snapshot};

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid dataset URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode {location}: {reason}")]
    Decode { location: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No dataset has been loaded")]
    NotLoaded,
}
