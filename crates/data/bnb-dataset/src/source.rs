//! Dataset sources
//!
//! The remote layout is a folder with an `index.json` naming the part files:
//!
//! ```json
//! { "parts": ["airbnb-1.json", "airbnb-2.json"] }
//! ```
//!
//! Each part is a JSON array of property records. Parts are fetched
//! concurrently and concatenated in index order.

use crate::{Error, Result};
use async_trait::async_trait;
use bnb_config::DatasetSource;
use bnb_core::Property;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// `index.json` listing the dataset parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub parts: Vec<String>,
}

/// Something that can produce a full property collection
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Load every record, in dataset order
    async fn load(&self) -> Result<Vec<Property>>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

/// Build the source described by configuration
pub fn source_for(source: &DatasetSource, timeout: Duration) -> Result<Box<dyn PropertySource>> {
    Ok(match source {
        DatasetSource::Remote { base_url } => Box::new(RemoteSource::new(base_url, timeout)?),
        DatasetSource::Bundled { path } => Box::new(BundledSource::new(path)),
    })
}

// ============== Remote ==============

/// `index.json` + parts over HTTP
pub struct RemoteSource {
    base: Url,
    client: reqwest::Client,
}

impl RemoteSource {
    /// `base_url` is the folder holding `index.json`; a trailing `/` is added if missing.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Connection {
                url: raw,
                reason: e.to_string(),
            })?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, name: &str) -> Result<Url> {
        self.base.join(name).map_err(|e| Error::InvalidUrl {
            url: format!("{}{}", self.base, name),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::Connection {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| Error::Decode {
            location: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl PropertySource for RemoteSource {
    async fn load(&self) -> Result<Vec<Property>> {
        let index: Index = self.get_json(self.resolve("index.json")?).await?;
        let urls = index
            .parts
            .iter()
            .map(|part| self.resolve(part))
            .collect::<Result<Vec<_>>>()?;

        let parts = futures::future::try_join_all(
            urls.into_iter().map(|url| self.get_json::<Vec<Property>>(url)),
        )
        .await?;

        tracing::debug!("fetched {} parts from {}", parts.len(), self.base);
        Ok(parts.into_iter().flatten().collect())
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base)
    }
}

// ============== Bundled ==============

/// Local JSON array file, or a directory with `index.json` + parts
pub struct BundledSource {
    path: PathBuf,
}

impl BundledSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
        location: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl PropertySource for BundledSource {
    async fn load(&self) -> Result<Vec<Property>> {
        let meta = tokio::fs::metadata(&self.path).await.map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        if !meta.is_dir() {
            return read_json(&self.path).await;
        }

        let index: Index = read_json(&self.path.join("index.json")).await?;
        let paths: Vec<PathBuf> = index.parts.iter().map(|p| self.path.join(p)).collect();
        let parts =
            futures::future::try_join_all(paths.iter().map(|p| read_json::<Vec<Property>>(p)))
                .await?;

        Ok(parts.into_iter().flatten().collect())
    }

    fn describe(&self) -> String {
        format!("bundled {}", self.path.display())
    }
}

// ============== Memory ==============

/// Fixed records, cloned on every load
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Property>,
}

impl MemorySource {
    pub fn new(records: Vec<Property>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl PropertySource for MemorySource {
    async fn load(&self) -> Result<Vec<Property>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}
