//! User-tunable ledger settings and their JSON persistence.

use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::UnresolvedReferencePolicy;

const DEFAULT_DIR_NAME: &str = ".noboros";
const CONFIG_FILE: &str = "config.json";
const HOME_ENV: &str = "NOBOROS_HOME";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Settings consumed by the composition root when building a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Create a starter account when the store is built.
    #[serde(default = "LedgerConfig::default_seed_account")]
    pub seed_default_account: bool,
    #[serde(default = "LedgerConfig::default_account_name_value")]
    pub default_account_name: String,
    /// Minutes between the synthetic leading history point and the first transaction.
    #[serde(default = "LedgerConfig::default_history_anchor_minutes")]
    pub history_anchor_minutes: i64,
    #[serde(default)]
    pub unresolved_references: UnresolvedReferencePolicy,
    /// Tracing directive used instead of the built-in default when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            seed_default_account: Self::default_seed_account(),
            default_account_name: Self::default_account_name_value(),
            history_anchor_minutes: Self::default_history_anchor_minutes(),
            unresolved_references: UnresolvedReferencePolicy::default(),
            log_filter: None,
        }
    }
}

impl LedgerConfig {
    pub fn default_seed_account() -> bool {
        true
    }

    pub fn default_account_name_value() -> String {
        "Cash".into()
    }

    pub fn default_history_anchor_minutes() -> i64 {
        1
    }

    /// Rejects values that would crash or reorder the balance history.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_anchor_minutes < 1 {
            return Err(ConfigError::Invalid {
                field: "history_anchor_minutes",
                reason: format!("must be at least 1, got {}", self.history_anchor_minutes),
            });
        }
        if Duration::try_minutes(self.history_anchor_minutes).is_none() {
            return Err(ConfigError::Invalid {
                field: "history_anchor_minutes",
                reason: format!("{} minutes is out of range", self.history_anchor_minutes),
            });
        }
        Ok(())
    }

    /// Anchor offset for the history chart; unusable values fall back to the default.
    pub fn history_anchor(&self) -> Duration {
        Duration::try_minutes(self.history_anchor_minutes)
            .filter(|offset| *offset > Duration::zero())
            .unwrap_or_else(|| Duration::minutes(Self::default_history_anchor_minutes()))
    }
}

/// Loads and stores [`LedgerConfig`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `<base>/config.json`.
    pub fn with_base_dir(base: impl AsRef<Path>) -> Self {
        Self::new(base.as_ref().join(CONFIG_FILE))
    }

    /// Resolves the base directory from `NOBOROS_HOME`, defaulting to `~/.noboros`.
    pub fn from_env() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns defaults when no file exists yet.
    pub fn load(&self) -> Result<LedgerConfig, ConfigError> {
        if !self.path.exists() {
            return Ok(LedgerConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: LedgerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &LedgerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Application data directory, honouring `NOBOROS_HOME`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".");
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()
}
