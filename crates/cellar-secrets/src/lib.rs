//! Secret resolution for Cellar
//!
//! This crate turns logical secret names into current secret values:
//! - **Caching**: process-lifetime cache shared by every resolution
//! - **Batching**: uncached identifiers are fetched in a single vault request
//! - **Validation**: only enabled records with an active version are accepted
//! - **Security**: values are held in zeroize-on-drop, redacted strings

pub mod cache;
pub mod env;
pub mod error;
pub mod resolver;
pub mod security;
pub mod transport;
pub mod types;
pub mod wire;

pub use cache::{CacheStats, MemoryCache, SecretCache};
pub use env::{EnvError, EnvLoader, EnvSource, ProcessEnv};
pub use error::{ResolutionError, TransportError};
pub use resolver::BatchResolver;
pub use security::SecureString;
pub use transport::{ApiResponse, AuthenticatedClient, HttpClient};
pub use types::{ResolvedSecrets, SecretId, SecretRequest};

use anyhow::{Context, Result};
use cellar_core::types::RuntimeConfig;
use std::sync::Arc;

/// Build a resolver talking to the configured vault, backed by `cache`
pub fn resolver_from_config(
    config: &RuntimeConfig,
    cache: Arc<dyn SecretCache>,
) -> Result<BatchResolver> {
    let client = HttpClient::from_config(config).with_context(|| {
        format!(
            "Failed to create vault client for {}",
            config.vault.base_url()
        )
    })?;
    Ok(BatchResolver::new(Arc::new(client), cache))
}

/// Resolve a single request with a fresh in-memory cache
pub async fn resolve_secrets(
    config: &RuntimeConfig,
    request: &SecretRequest,
) -> Result<ResolvedSecrets> {
    let resolver = resolver_from_config(config, Arc::new(MemoryCache::new()))?;
    resolver
        .resolve(request)
        .await
        .context("Failed to resolve secrets")
}
