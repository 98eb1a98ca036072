//! Snapshot store: the one piece of shared state in the system

use crate::source::{source_for, PropertySource};
use crate::{Error, Result};
use bnb_config::{DatasetConfig, RefreshPolicy};
use bnb_core::Property;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Immutable view of one load
pub type Snapshot = Arc<[Property]>;

/// Load statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    pub successful_loads: u64,
    pub failed_loads: u64,
    /// Requests answered from the previous snapshot after a failed reload
    pub stale_served: u64,
}

#[derive(Clone)]
struct Loaded {
    properties: Snapshot,
    loaded_at: DateTime<Utc>,
}

/// Holds the latest snapshot and reloads it from a [`PropertySource`].
pub struct DatasetStore {
    source: Box<dyn PropertySource>,
    current: RwLock<Option<Loaded>>,
    stats: RwLock<LoadStats>,
}

impl DatasetStore {
    pub fn new(source: Box<dyn PropertySource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            stats: RwLock::new(LoadStats::default()),
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        let source = source_for(&config.source, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(source))
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Load the full dataset and swap it in. Existing snapshots are untouched.
    pub async fn reload(&self) -> Result<Snapshot> {
        let started = Instant::now();

        let records = match self.source.load().await {
            Ok(records) => records,
            Err(e) => {
                self.stats.write().await.failed_loads += 1;
                return Err(e);
            }
        };

        let snapshot: Snapshot = records.into();
        *self.current.write().await = Some(Loaded {
            properties: snapshot.clone(),
            loaded_at: Utc::now(),
        });
        self.stats.write().await.successful_loads += 1;

        tracing::info!(
            records = snapshot.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded dataset from {}",
            self.source.describe()
        );
        Ok(snapshot)
    }

    /// Latest snapshot without loading
    pub async fn current(&self) -> Option<Snapshot> {
        self.current.read().await.as_ref().map(|l| l.properties.clone())
    }

    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.current.read().await.as_ref().map(|l| l.loaded_at)
    }

    /// Snapshot for one request.
    ///
    /// `PerRequest` reloads first and falls back to the previous snapshot when
    /// the reload fails. `Startup` reuses the current snapshot, loading only if
    /// nothing has been loaded yet.
    pub async fn snapshot(&self, policy: RefreshPolicy) -> Result<Snapshot> {
        match policy {
            RefreshPolicy::PerRequest => match self.reload().await {
                Ok(snapshot) => Ok(snapshot),
                Err(e) => {
                    let Some(stale) = self.current().await else {
                        return Err(e);
                    };
                    tracing::warn!("dataset reload failed, serving previous snapshot: {}", e);
                    self.stats.write().await.stale_served += 1;
                    Ok(stale)
                }
            },
            RefreshPolicy::Startup => match self.current().await {
                Some(snapshot) => Ok(snapshot),
                None => self.reload().await,
            },
        }
    }

    /// Current snapshot, or [`Error::NotLoaded`]
    pub async fn require(&self) -> Result<Snapshot> {
        self.current().await.ok_or(Error::NotLoaded)
    }

    pub async fn stats(&self) -> LoadStats {
        self.stats.read().await.clone()
    }
}
