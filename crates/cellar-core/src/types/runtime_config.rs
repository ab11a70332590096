//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls how the client reaches the
//! remote vault: endpoint, credentials, HTTP timeouts and retry policy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Remote vault endpoint and credentials
    #[serde(default)]
    pub vault: VaultConfig,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Retry policy applied to every vault request
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Remote vault endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VaultConfig {
    /// Whether secrets are looked up in the vault at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Cloud domain hosting the service (e.g. `aws.us.example.cloud`)
    #[serde(default)]
    pub domain: String,

    /// Service subdomain prefix
    #[serde(default = "default_service")]
    pub service: String,

    /// URL scheme, `https` unless talking to a local emulator
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Bearer token. Normally supplied through `CELLAR_TOKEN` only.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            domain: String::new(),
            service: default_service(),
            scheme: default_scheme(),
            token: None,
        }
    }
}

impl VaultConfig {
    /// Base URL of the vault service, `{scheme}://{service}.{domain}`
    pub fn base_url(&self) -> String {
        format!("{}://{}.{}", self.scheme, self.service, self.domain)
    }

    /// Check that an enabled vault has everything needed to make requests
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.domain.trim().is_empty() {
            return Err(Error::missing_field("vault.domain"));
        }
        if self.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(Error::missing_field("vault.token"));
        }
        match self.scheme.as_str() {
            "http" | "https" => Ok(()),
            other => Err(Error::invalid_config(format!(
                "vault.scheme must be http or https, got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("enabled", &self.enabled)
            .field("domain", &self.domain)
            .field("service", &self.service)
            .field("scheme", &self.scheme)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_enabled() -> bool {
    false
}
fn default_service() -> String {
    "vault".to_string()
}
fn default_scheme() -> String {
    "https".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// HTTP timeout in seconds, applied per attempt
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!(
        "cellar/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Retry policy for an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Retry strategy
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    250
}
fn default_max_delay() -> u64 {
    10_000
}

/// Retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// Retry immediately
    None,

    /// Fixed delay between retries
    FixedDelay,

    /// Exponential backoff (default)
    #[default]
    ExponentialBackoff,
}
