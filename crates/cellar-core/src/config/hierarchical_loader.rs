//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. Global config (~/.cellar/config.yaml)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (CELLAR_* prefix)
//! 5. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{RetryStrategy, RuntimeConfig};
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Name of the global configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Create a loader rooted at the standard config directory (~/.cellar)
    pub fn new() -> Result<Self> {
        // $HOME first, then the platform lookup
        let home = env::var_os("HOME")
            .map(std::path::PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::from_path_buf(home).map_err(|p| {
            Error::invalid_config(format!("Non UTF-8 home directory: {}", p.display()))
        })?;
        Ok(Self::with_dir(home.join(".cellar")))
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self, explicit: Option<&Utf8Path>) -> Result<RuntimeConfig> {
        self.load_with_env(explicit, |key| env::var(key).ok())
    }

    /// Same as [`load_runtime_config`](Self::load_runtime_config) with an injected
    /// environment lookup
    pub fn load_with_env<F>(&self, explicit: Option<&Utf8Path>, lookup: F) -> Result<RuntimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = serde_yaml_ng::to_value(RuntimeConfig::default())?;

        let global_path = self.config_dir.join(CONFIG_FILE_NAME);
        if global_path.exists() {
            debug!("Loading global config: {}", global_path);
            merge_values(&mut merged, Self::load_yaml_file(&global_path)?);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            debug!("Loading config: {}", path);
            merge_values(&mut merged, Self::load_yaml_file(path)?);
        }

        let config: RuntimeConfig = serde_yaml_ng::from_value(merged)?;
        Self::apply_env_overrides(config, lookup)
    }

    /// Load a YAML (or JSON) file as an untyped tree
    fn load_yaml_file(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml_ng::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_string(),
            source,
        })
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides<F>(mut config: RuntimeConfig, lookup: F) -> Result<RuntimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CELLAR_USE_VAULT") {
            config.vault.enabled = parse_flag(&val);
        }

        if let Some(val) = lookup("CELLAR_DOMAIN") {
            config.vault.domain = val;
        }

        if let Some(val) = lookup("CELLAR_SERVICE") {
            config.vault.service = val;
        }

        if let Some(val) = lookup("CELLAR_SCHEME") {
            config.vault.scheme = val;
        }

        if let Some(val) = lookup("CELLAR_TOKEN") {
            config.vault.token = Some(val);
        }

        if let Some(val) = lookup("CELLAR_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = parse_number("CELLAR_HTTP_TIMEOUT_SECS", &val)?;
        }

        if let Some(val) = lookup("CELLAR_MAX_ATTEMPTS") {
            config.retry.max_attempts = parse_number("CELLAR_MAX_ATTEMPTS", &val)?;
        }

        if let Some(val) = lookup("CELLAR_RETRY_STRATEGY") {
            config.retry.strategy = match val.as_str() {
                "none" => RetryStrategy::None,
                "fixed-delay" => RetryStrategy::FixedDelay,
                "exponential-backoff" => RetryStrategy::ExponentialBackoff,
                _ => {
                    return Err(Error::invalid_env_var(
                        "CELLAR_RETRY_STRATEGY",
                        &val,
                        "none, fixed-delay or exponential-backoff",
                    ))
                }
            };
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// Deep-merge `overlay` into `base`; mappings merge key by key, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| Error::invalid_env_var(name, val, "a whole number"))
}

fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
