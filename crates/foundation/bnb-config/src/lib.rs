//! # bnb-config
//!
//! Configuration for the listing browser, layered in increasing priority:
//!
//! 1. built-in defaults
//! 2. YAML file (`--config FILE`, else `~/.config/bnb/config.yaml` if present)
//! 3. environment (`BNB_BIND`, `PORT`, `BNB_DATASET_URL`, `BNB_DATASET_PATH`,
//!    `BNB_REFRESH`, `BNB_PUBLIC_DIR`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CDN folder holding `index.json` and the dataset parts
pub const DEFAULT_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/JahnaviEtikoti/Asn2-Jahnavi_Etikoti-JSON/";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Where property records come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    /// `index.json` + parts over HTTP
    Remote { base_url: String },
    /// A JSON array file, or a directory laid out like the remote
    Bundled { path: PathBuf },
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Remote {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Remote { base_url } => write!(f, "remote {}", base_url),
            DatasetSource::Bundled { path } => write!(f, "bundled {}", path.display()),
        }
    }
}

/// When the web layer reloads the dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Reload before every data page
    #[default]
    PerRequest,
    /// Load once at boot; reload only on demand
    Startup,
}

impl FromStr for RefreshPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_request" | "per-request" | "request" => Ok(RefreshPolicy::PerRequest),
            "startup" | "once" => Ok(RefreshPolicy::Startup),
            other => Err(Error::InvalidValue {
                key: "refresh".into(),
                value: other.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Static files served at `/`. Falls back to the web crate's bundled `public/`.
    pub public_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            public_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub source: DatasetSource,
    pub refresh: RefreshPolicy,
    /// HTTP timeout per request to the remote source
    pub timeout_secs: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            refresh: RefreshPolicy::default(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults, then the YAML file, then the process environment.
    ///
    /// An explicit `path` must exist; the default path is skipped when missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// The file [`Config::load`] reads: `path` if given, else the default path when it exists.
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        }
    }

    /// `~/.config/bnb/config.yaml` (platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bnb").join("config.yaml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply environment overrides read through `get`.
    ///
    /// `PORT` replaces only the port of the bind address and wins over `BNB_BIND`.
    /// `BNB_DATASET_PATH` wins over `BNB_DATASET_URL`.
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get("BNB_BIND") {
            self.server.bind = bind;
        }
        if let Some(port) = get("PORT") {
            self.server.bind = with_port(&self.server.bind, &port)?;
        }
        if let Some(dir) = get("BNB_PUBLIC_DIR") {
            self.server.public_dir = Some(PathBuf::from(dir));
        }
        if let Some(base_url) = get("BNB_DATASET_URL") {
            self.dataset.source = DatasetSource::Remote { base_url };
        }
        if let Some(path) = get("BNB_DATASET_PATH") {
            self.dataset.source = DatasetSource::Bundled {
                path: PathBuf::from(path),
            };
        }
        if let Some(refresh) = get("BNB_REFRESH") {
            self.dataset.refresh = refresh.parse()?;
        }
        Ok(())
    }
}

/// Replace the port of `host:port`, keeping the host.
pub fn with_port(bind: &str, port: &str) -> Result<String> {
    let port: u16 = port.trim().parse().map_err(|_| Error::InvalidValue {
        key: "PORT".into(),
        value: port.into(),
    })?;
    let host = bind.rsplit_once(':').map(|(host, _)| host).unwrap_or(bind);
    Ok(format!("{}:{}", host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.dataset.refresh, RefreshPolicy::PerRequest);
        assert_eq!(
            config.dataset.source,
            DatasetSource::Remote {
                base_url: DEFAULT_BASE_URL.into()
            }
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  bind: 127.0.0.1:8080
dataset:
  source:
    kind: bundled
    path: data/airbnb.json
  refresh: startup
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.public_dir, None);
        assert_eq!(
            config.dataset.source,
            DatasetSource::Bundled {
                path: PathBuf::from("data/airbnb.json")
            }
        );
        assert_eq!(config.dataset.refresh, RefreshPolicy::Startup);
        assert_eq!(config.dataset.timeout_secs, 10);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml() {
        let err = Config::from_yaml("dataset:\n  refresh: sometimes\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("BNB_BIND", "127.0.0.1:4000"),
                ("PORT", "5005"),
                ("BNB_DATASET_URL", "http://localhost:9000/data/"),
                ("BNB_REFRESH", "startup"),
                ("BNB_PUBLIC_DIR", "/srv/public"),
            ]))
            .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:5005");
        assert_eq!(config.server.public_dir, Some(PathBuf::from("/srv/public")));
        assert_eq!(
            config.dataset.source,
            DatasetSource::Remote {
                base_url: "http://localhost:9000/data/".into()
            }
        );
        assert_eq!(config.dataset.refresh, RefreshPolicy::Startup);
    }

    #[test]
    fn test_dataset_path_wins_over_url() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("BNB_DATASET_URL", "http://localhost:9000/"),
                ("BNB_DATASET_PATH", "data/airbnb.json"),
            ]))
            .unwrap();
        assert!(matches!(config.dataset.source, DatasetSource::Bundled { .. }));
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("PORT", "  "), ("BNB_BIND", "")])).unwrap();
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "PORT"));

        let err = config.apply_env(env(&[("BNB_REFRESH", "hourly")])).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "refresh"));
    }

    #[test]
    fn test_with_port() {
        assert_eq!(with_port("0.0.0.0:3000", "80").unwrap(), "0.0.0.0:80");
        assert_eq!(with_port("[::1]:3000", "81").unwrap(), "[::1]:81");
        assert_eq!(with_port("localhost", "82").unwrap(), "localhost:82");
        assert!(with_port("0.0.0.0:3000", "70000").is_err());
    }

    #[test]
    fn test_refresh_policy_parse() {
        assert_eq!("per-request".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::PerRequest);
        assert_eq!(" STARTUP ".parse::<RefreshPolicy>().unwrap(), RefreshPolicy::Startup);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log:\n  filter: debug\n  json: true").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
        assert!(config.log.json);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert_eq!(Config::resolve_path(Some(&path)), Some(path.clone()));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
