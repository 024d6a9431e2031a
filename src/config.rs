//! Settings for the checkpoint persister
//!
//! Settings are loaded from YAML, optionally overridden from the environment,
//! and turned into a ready-to-use [`CheckpointPersister`].
//!
//! ```yaml
//! log_level: INFO
//! use_stream_capable_state: true
//! downgrade_policy: warn
//! store:
//!   type: api
//!   base_url: http://airbyte-server:8001
//!   timeout_secs: 30
//! ```

use crate::error::{Error, Result};
use crate::flags::{EnvVariableFeatureFlags, FeatureFlags, StaticFeatureFlags};
use crate::http::HttpClientConfig;
use crate::persister::CheckpointPersister;
use crate::state::DowngradePolicy;
use crate::store::{ApiStateStore, FileStateStore, InMemoryStateStore, StateStore};
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding the store with an API store at this URL
pub const STORE_URL_ENV: &str = "CHECKPOINT_STORE_URL";

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete persister settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Default log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Fixed per-stream capability, read from the environment when absent
    #[serde(default)]
    pub use_stream_capable_state: Option<bool>,

    /// What to do when per-stream state goes back to legacy
    #[serde(default)]
    pub downgrade_policy: DowngradePolicy,

    /// Where checkpoints are stored
    #[serde(default)]
    pub store: StoreConfig,
}

// ============================================================================
// Store Config
// ============================================================================

/// Checkpoint store selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local map
    #[default]
    Memory,

    /// One JSON file per connection under `path`
    File { path: PathBuf },

    /// Control-plane state API
    Api {
        base_url: String,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,

        /// Extra headers sent with every request
        #[serde(default)]
        headers: HashMap<String, String>,
    },
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Parse and validate settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Apply overrides from process environment variables
    #[must_use]
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup
    #[must_use]
    pub fn apply_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(STORE_URL_ENV).filter(|url| !url.is_empty()) {
            self.store = match self.store {
                StoreConfig::Api {
                    timeout_secs,
                    headers,
                    ..
                } => StoreConfig::Api {
                    base_url: url,
                    timeout_secs,
                    headers,
                },
                _ => StoreConfig::Api {
                    base_url: url,
                    timeout_secs: default_timeout_secs(),
                    headers: HashMap::new(),
                },
            };
        }
        self
    }

    /// Check settings for values that cannot work
    pub fn validate(&self) -> Result<()> {
        match &self.store {
            StoreConfig::Memory => Ok(()),
            StoreConfig::File { path } if path.as_os_str().is_empty() => {
                Err(Error::missing_field("store.path"))
            }
            StoreConfig::File { .. } => Ok(()),
            StoreConfig::Api { base_url, .. } if base_url.is_empty() => {
                Err(Error::missing_field("store.base_url"))
            }
            StoreConfig::Api {
                base_url,
                timeout_secs,
                ..
            } => {
                url::Url::parse(base_url)?;
                if *timeout_secs == 0 {
                    return Err(Error::config("store.timeout_secs must be greater than 0"));
                }
                Ok(())
            }
        }
    }

    /// Build the configured store
    pub fn build_store(&self) -> Result<Arc<dyn StateStore>> {
        self.validate()?;

        let store: Arc<dyn StateStore> = match &self.store {
            StoreConfig::Memory => Arc::new(InMemoryStateStore::new()),
            StoreConfig::File { path } => Arc::new(FileStateStore::new(path)?),
            StoreConfig::Api {
                base_url,
                timeout_secs,
                headers,
            } => {
                let mut config = HttpClientConfig::builder()
                    .base_url(base_url.clone())
                    .timeout(Duration::from_secs(*timeout_secs));
                for (key, value) in headers {
                    config = config.header(key.clone(), value.clone());
                }
                Arc::new(ApiStateStore::new(config.build())?)
            }
        };

        Ok(store)
    }

    /// Build the configured feature flag source
    pub fn build_flags(&self) -> Arc<dyn FeatureFlags> {
        match self.use_stream_capable_state {
            Some(value) => Arc::new(StaticFeatureFlags::new(value)),
            None => Arc::new(EnvVariableFeatureFlags),
        }
    }

    /// Build a persister from these settings
    pub fn build_persister(&self) -> Result<CheckpointPersister> {
        let store = self.build_store()?;
        Ok(CheckpointPersister::new(store, self.build_flags())
            .with_downgrade_policy(self.downgrade_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_settings_uses_defaults() {
        let settings = Settings::from_yaml_str("{}").unwrap();
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.use_stream_capable_state, None);
        assert_eq!(settings.downgrade_policy, DowngradePolicy::Allow);
        assert_eq!(settings.store, StoreConfig::Memory);
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r#"
log_level: DEBUG
use_stream_capable_state: true
downgrade_policy: reject
store:
  type: api
  base_url: "http://localhost:8001"
  headers:
    X-Api-Key: secret
"#;

        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.use_stream_capable_state, Some(true));
        assert_eq!(settings.downgrade_policy, DowngradePolicy::Reject);

        match settings.store {
            StoreConfig::Api {
                base_url,
                timeout_secs,
                headers,
            } => {
                assert_eq!(base_url, "http://localhost:8001");
                assert_eq!(timeout_secs, 30);
                assert_eq!(headers.get("X-Api-Key"), Some(&"secret".to_string()));
            }
            other => panic!("unexpected store: {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_store() {
        let settings = Settings::from_yaml_str("store:\n  type: file\n  path: /tmp/state\n").unwrap();
        assert_eq!(
            settings.store,
            StoreConfig::File {
                path: PathBuf::from("/tmp/state")
            }
        );
    }

    #[test]
    fn test_invalid_settings() {
        let err = Settings::from_yaml_str("store:\n  type: api\n  base_url: \"not a url\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = Settings::from_yaml_str("store:\n  type: file\n  path: \"\"\n").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));

        let err = Settings::from_yaml_str(
            "store:\n  type: api\n  base_url: \"http://x\"\n  timeout_secs: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Settings::from_yaml_str("store:\n  type: redis\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_store_url_override() {
        let settings = Settings::default().apply_overrides_from(|key| {
            (key == STORE_URL_ENV).then(|| "http://control-plane:8001".to_string())
        });

        assert_eq!(
            settings.store,
            StoreConfig::Api {
                base_url: "http://control-plane:8001".to_string(),
                timeout_secs: 30,
                headers: HashMap::new(),
            }
        );
    }

    #[test]
    fn test_store_url_override_keeps_api_options() {
        let settings = Settings {
            store: StoreConfig::Api {
                base_url: "http://old".to_string(),
                timeout_secs: 5,
                headers: HashMap::new(),
            },
            ..Default::default()
        }
        .apply_overrides_from(|_| Some("http://new".to_string()));

        assert!(matches!(
            settings.store,
            StoreConfig::Api { ref base_url, timeout_secs: 5, .. } if base_url == "http://new"
        ));
    }

    #[test]
    fn test_no_override_when_unset() {
        let settings = Settings::default().apply_overrides_from(|_| None);
        assert_eq!(settings.store, StoreConfig::Memory);
    }

    #[test]
    fn test_build_flags() {
        let settings = Settings {
            use_stream_capable_state: Some(true),
            ..Default::default()
        };
        assert!(settings.build_flags().use_stream_capable_state());
    }

    #[test]
    fn test_from_file_and_build_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("states");
        let config_path = dir.path().join("settings.yaml");
        std::fs::write(
            &config_path,
            format!(
                "downgrade_policy: warn\nstore:\n  type: file\n  path: {}\n",
                state_dir.display()
            ),
        )
        .unwrap();

        let settings = Settings::from_file(&config_path).unwrap();
        let persister = settings.build_persister().unwrap();

        assert_eq!(persister.downgrade_policy(), DowngradePolicy::Warn);
        assert!(state_dir.is_dir());
    }

    #[test]
    fn test_from_missing_file() {
        let err = Settings::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
