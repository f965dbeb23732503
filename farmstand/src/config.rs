//! Application configuration file support.
//!
//! Settings are read from a `farmstand.toml` file and can be overridden
//! through `FARMSTAND_*` environment variables. Every section is optional.
//!
//! ```toml
//! [availability]
//! policy = "strict"          # or "permissive"
//!
//! [calendar]
//! default_month = "2023-06"  # current month when unset
//!
//! [catalog]
//! seed_path = "data/demo_catalog.json"
//!
//! [content]
//! default_description = "Fresh from the farm."
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info};

use crate::models::{DateError, MissingBoundPolicy, YearMonth};
use crate::services::content::{ContentGenerator, ResilientContent, DEFAULT_DESCRIPTION};

/// Explicit config file path.
pub const ENV_CONFIG: &str = "FARMSTAND_CONFIG";
/// Overrides `availability.policy`.
pub const ENV_POLICY: &str = "FARMSTAND_POLICY";
/// Overrides `catalog.seed_path`.
pub const ENV_SEED: &str = "FARMSTAND_SEED";
/// Overrides `calendar.default_month`.
pub const ENV_MONTH: &str = "FARMSTAND_MONTH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub availability: AvailabilitySettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub content: ContentSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySettings {
    /// How listings without a complete window answer availability queries.
    #[serde(default)]
    pub policy: MissingBoundPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Month a calendar opens on when none is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_month: Option<YearMonth>,
}

impl CalendarSettings {
    /// The configured month, or the month containing `today`.
    pub fn month_or(&self, today: NaiveDate) -> Result<YearMonth, DateError> {
        match self.default_month {
            Some(month) => Ok(month),
            None => YearMonth::containing(today),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON snapshot to seed the store with. The bundled demo catalog is
    /// used when unset.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            default_description: default_description(),
        }
    }
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl AppConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the first `farmstand.toml` found in:
    /// 1. `$FARMSTAND_CONFIG`
    /// 2. Current directory
    /// 3. `farmstand/` directory
    /// 4. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists anywhere.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        if let Ok(path) = env::var(ENV_CONFIG) {
            return Self::from_file(path).map(Some);
        }

        let search_paths = [
            PathBuf::from("farmstand.toml"),
            PathBuf::from("farmstand/farmstand.toml"),
            PathBuf::from("../farmstand.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }

        debug!("No farmstand.toml found in standard locations, using defaults");
        Ok(None)
    }

    /// Apply `FARMSTAND_POLICY`, `FARMSTAND_SEED` and `FARMSTAND_MONTH`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(policy) = env::var(ENV_POLICY) {
            self.availability.policy = policy.parse().map_err(|message| ConfigError::InvalidValue {
                key: ENV_POLICY.to_string(),
                message,
            })?;
        }

        if let Ok(seed) = env::var(ENV_SEED) {
            self.catalog.seed_path = (!seed.trim().is_empty()).then(|| PathBuf::from(seed));
        }

        if let Ok(month) = env::var(ENV_MONTH) {
            let month = month.parse().map_err(|e: DateError| ConfigError::InvalidValue {
                key: ENV_MONTH.to_string(),
                message: e.to_string(),
            })?;
            self.calendar.default_month = Some(month);
        }

        Ok(())
    }

    /// File configuration (or defaults) with environment overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?.unwrap_or_default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Wrap `generator` with the configured fallback copy.
    pub fn content_service<G: ContentGenerator>(&self, generator: G) -> ResilientContent<G> {
        ResilientContent::new(generator)
            .with_default_description(self.content.default_description.clone())
    }
}
