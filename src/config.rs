//! Provider configuration.
//!
//! Precedence when loading: explicit path > `MEMSTORE_CONFIG` > `./memstore.toml`
//! > defaults; environment overrides are applied last.

use crate::errors::{Result, StoreError};
use crate::query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "MEMSTORE_CONFIG";
const CONFIG_FILE: &str = "memstore.toml";

/// Logging section, consumed by [`crate::utils::logger::configure_from`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub level: Option<String>,
    pub retention: Option<usize>,
}

impl LogConfig {
    /// Read MEMSTORE_LOG_DIR, MEMSTORE_LOG_LEVEL and MEMSTORE_LOG_RETENTION.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dir: std::env::var("MEMSTORE_LOG_DIR").ok().map(PathBuf::from),
            level: std::env::var("MEMSTORE_LOG_LEVEL").ok(),
            retention: std::env::var("MEMSTORE_LOG_RETENTION")
                .ok()
                .and_then(|s| s.parse::<usize>().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Page length used when a paginate directive leaves it unset.
    pub default_page_size: usize,
    /// Reject point queries whose key value count differs from the declared key count.
    pub strict_key_arity: bool,
    pub log: LogConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { default_page_size: DEFAULT_PAGE_SIZE, strict_key_arity: true, log: LogConfig::default() }
    }
}

impl ProviderConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or an invalid value.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from the first config file found, then apply environment overrides.
    ///
    /// # Errors
    /// Returns an error if an explicitly named file cannot be read, or any
    /// file found is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        log::debug!("loading provider config from {}", path.display());
        Self::from_toml_str(&s)
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            paths.push(PathBuf::from(p));
        }
        if let Ok(cur) = std::env::current_dir() {
            paths.push(cur.join(CONFIG_FILE));
        }
        paths
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(s) = std::env::var("MEMSTORE_DEFAULT_PAGE_SIZE") {
            self.default_page_size = s
                .parse::<usize>()
                .map_err(|e| StoreError::Config(format!("MEMSTORE_DEFAULT_PAGE_SIZE={s}: {e}")))?;
        }
        if let Ok(s) = std::env::var("MEMSTORE_STRICT_KEY_ARITY") {
            self.strict_key_arity = matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        let env_log = LogConfig::from_env();
        if env_log.dir.is_some() {
            self.log.dir = env_log.dir;
        }
        if env_log.level.is_some() {
            self.log.level = env_log.level;
        }
        if env_log.retention.is_some() {
            self.log.retention = env_log.retention;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(StoreError::Config("default_page_size must be at least 1".into()));
        }
        Ok(())
    }
}
