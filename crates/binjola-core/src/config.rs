//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use binjola_navigation::{DEFAULT_SEARCH_ENGINE, DEFAULT_SUGGESTION_ENDPOINT};
use binjola_tabs::DEFAULT_MAX_CLOSED_TABS;

use crate::error::CoreError;
use crate::Result;

const DEFAULT_SUGGESTION_TIMEOUT_SECS: u64 = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Organization half of the application identifier pair
    pub organization: String,
    /// Application half of the application identifier pair
    pub application: String,
    /// Root for per-application data
    pub data_dir: PathBuf,
    /// Explicit database location; derived from the identifier pair when unset
    pub database_path: Option<PathBuf>,
    /// URL loaded into new tabs
    pub homepage: String,
    /// Search engine URL template
    pub search_engine: String,
    /// Suggestion service URL template
    pub suggestion_endpoint: String,
    pub suggestion_timeout_secs: u64,
    /// How many closed tabs can be reopened
    pub max_closed_tabs: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            organization: "MyApp".to_string(),
            application: "WebKitBrowser".to_string(),
            data_dir,
            database_path: None,
            homepage: "about:blank".to_string(),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            suggestion_endpoint: DEFAULT_SUGGESTION_ENDPOINT.to_string(),
            suggestion_timeout_secs: DEFAULT_SUGGESTION_TIMEOUT_SECS,
            max_closed_tabs: DEFAULT_MAX_CLOSED_TABS,
        }
    }

    /// Read a JSON config file; absent fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::info!(path = %path.as_ref().display(), "Loaded configuration");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() || self.application.trim().is_empty() {
            return Err(CoreError::Config(
                "organization and application must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `<data_dir>/<organization>/<application>/binjola.db` unless overridden
    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(|| {
            self.data_dir
                .join(&self.organization)
                .join(&self.application)
                .join("binjola.db")
        })
    }

    pub fn suggestion_timeout(&self) -> Duration {
        if self.suggestion_timeout_secs == 0 {
            tracing::warn!(
                default = DEFAULT_SUGGESTION_TIMEOUT_SECS,
                "suggestion_timeout_secs is 0, using default"
            );
            return Duration::from_secs(DEFAULT_SUGGESTION_TIMEOUT_SECS);
        }
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    /// Platform data directory. Always absolute: unset or relative
    /// `XDG_DATA_HOME` values are ignored.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir().unwrap_or_else(|| {
            let fallback = std::env::temp_dir().join("binjola");
            tracing::warn!(path = %fallback.display(), "No data directory found, using fallback");
            fallback
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
