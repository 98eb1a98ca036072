//! Application state for the web server

use bnb_config::{Config, RefreshPolicy};
use bnb_dataset::{DatasetStore, Snapshot};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::handlers::AppError;

/// Shared application state
pub struct AppState {
    /// Dataset loader + current snapshot
    pub store: DatasetStore,
    /// When data pages reload the dataset
    pub refresh: RefreshPolicy,
    /// Static files served at `/`
    pub public_dir: PathBuf,
    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: DatasetStore, refresh: RefreshPolicy) -> Self {
        Self {
            store,
            refresh,
            public_dir: default_public_dir(),
            started_at: Utc::now(),
        }
    }

    pub fn from_config(config: &Config) -> bnb_dataset::Result<Self> {
        let store = DatasetStore::from_config(&config.dataset)?;
        let mut state = Self::new(store, config.dataset.refresh);
        if let Some(dir) = &config.server.public_dir {
            state.public_dir = dir.clone();
        }
        Ok(state)
    }

    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// Snapshot for the current request, per the refresh policy
    pub async fn snapshot(&self) -> Result<Snapshot, AppError> {
        self.store
            .snapshot(self.refresh)
            .await
            .map_err(AppError::Dataset)
    }
}

/// `public/` next to this crate's manifest
pub fn default_public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}
