//! Application environment assembled from plain and vault-backed variables
//!
//! Plain keys are read as-is. Secret keys hold vault identifiers when vault
//! lookups are enabled; they are resolved together in one batch and the
//! merged result is kept for the lifetime of the loader.

use crate::error::ResolutionError;
use crate::resolver::BatchResolver;
use crate::security::SecureString;
use crate::types::SecretRequest;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Environment value {key} is missing")]
    Missing { key: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Where variable values come from. Empty values count as missing.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

pub struct EnvLoader {
    plain_keys: Vec<String>,
    secret_keys: Vec<String>,
    source: Box<dyn EnvSource>,
    resolver: Option<BatchResolver>,
    loaded: OnceCell<BTreeMap<String, SecureString>>,
}

impl EnvLoader {
    /// Loader over the process environment with vault lookups disabled
    pub fn new<P, S>(plain_keys: P, secret_keys: S) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let mut secrets: Vec<String> = Vec::new();
        for key in secret_keys.into_iter().map(Into::into) {
            if !secrets.contains(&key) {
                secrets.push(key);
            }
        }

        Self {
            plain_keys: plain_keys.into_iter().map(Into::into).collect(),
            secret_keys: secrets,
            source: Box::new(ProcessEnv),
            resolver: None,
            loaded: OnceCell::new(),
        }
    }

    pub fn with_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Enable vault lookups for secret keys. `None` keeps their raw values.
    pub fn with_resolver(mut self, resolver: Option<BatchResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn secret_keys(&self) -> &[String] {
        &self.secret_keys
    }

    /// Read every key, resolving secret keys through the vault when enabled
    ///
    /// A successful result is memoized; failures are not, so a later call
    /// retries.
    pub async fn load(&self) -> Result<&BTreeMap<String, SecureString>, EnvError> {
        self.loaded.get_or_try_init(|| self.read()).await
    }

    async fn read(&self) -> Result<BTreeMap<String, SecureString>, EnvError> {
        let mut values = BTreeMap::new();
        for key in &self.plain_keys {
            values.insert(key.clone(), SecureString::new(self.require(key)?));
        }

        let mut request = SecretRequest::new();
        for key in &self.secret_keys {
            request.insert(key.clone(), self.require(key)?);
        }

        match &self.resolver {
            Some(resolver) => {
                debug!("Resolving {} secret variable(s) from vault", request.len());
                values.extend(resolver.resolve(&request).await?);
            }
            None => {
                for (key, raw) in request.iter() {
                    values.insert(key.to_string(), SecureString::new(raw.as_str()));
                }
            }
        }

        Ok(values)
    }

    fn require(&self, key: &str) -> Result<String, EnvError> {
        self.source.var(key).ok_or_else(|| EnvError::Missing {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::transport::{ApiResponse, MockAuthenticatedClient};
    use serde_json::json;
    use serial_test::serial;
    use std::sync::Arc;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn get<'a>(values: &'a BTreeMap<String, SecureString>, key: &str) -> &'a str {
        values.get(key).map(SecureString::as_str).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_raw_values_without_vault() {
        let loader = EnvLoader::new(["BASE_URL"], ["CLIENT_SECRET"]).with_source(source(&[
            ("BASE_URL", "https://app.example.com"),
            ("CLIENT_SECRET", "raw-secret"),
        ]));

        let values = loader.load().await.unwrap();
        assert_eq!(get(values, "BASE_URL"), "https://app.example.com");
        assert_eq!(get(values, "CLIENT_SECRET"), "raw-secret");
    }

    #[tokio::test]
    async fn test_missing_key_is_error() {
        let loader = EnvLoader::new(["BASE_URL", "DOMAIN"], Vec::<String>::new())
            .with_source(source(&[("BASE_URL", "x")]));

        let err = loader.load().await.unwrap_err();
        assert!(matches!(&err, EnvError::Missing { key } if key == "DOMAIN"));
        assert_eq!(err.to_string(), "Environment value DOMAIN is missing");
    }

    #[tokio::test]
    async fn test_empty_value_counts_as_missing() {
        let loader = EnvLoader::new(Vec::<String>::new(), ["CLIENT_SECRET"])
            .with_source(source(&[("CLIENT_SECRET", "")]));

        assert!(matches!(
            loader.load().await,
            Err(EnvError::Missing { .. })
        ));
    }

    #[test]
    fn test_duplicate_secret_keys_collapse() {
        let loader = EnvLoader::new(Vec::<String>::new(), ["A", "B", "A", "B", "C"]);
        assert_eq!(loader.secret_keys(), ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_vault_values_are_resolved_once() {
        let mut client = MockAuthenticatedClient::new();
        client
            .expect_post()
            .times(1)
            .withf(|_, body| body["filter"]["id__in"] == json!(["pvi_1", "pvi_2"]))
            .returning(|_, _| {
                Ok(ApiResponse::new(
                    200,
                    json!({ "result": { "items": [
                        { "id": "pvi_1", "item_state": "enabled",
                          "current_version": { "secret": "client-id", "state": "active" } },
                        { "id": "pvi_2", "item_state": "enabled",
                          "current_version": { "secret": "client-secret", "state": "active" } }
                    ] } })
                    .to_string(),
                ))
            });
        let resolver = BatchResolver::new(Arc::new(client), Arc::new(MemoryCache::new()));

        let loader = EnvLoader::new(["BASE_URL"], ["CLIENT_ID", "CLIENT_SECRET"])
            .with_source(source(&[
                ("BASE_URL", "https://app.example.com"),
                ("CLIENT_ID", "pvi_1"),
                ("CLIENT_SECRET", "pvi_2"),
            ]))
            .with_resolver(Some(resolver));

        let values = loader.load().await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(get(values, "BASE_URL"), "https://app.example.com");
        assert_eq!(get(values, "CLIENT_ID"), "client-id");
        assert_eq!(get(values, "CLIENT_SECRET"), "client-secret");

        let again = loader.load().await.unwrap();
        assert_eq!(get(again, "CLIENT_SECRET"), "client-secret");
    }

    #[tokio::test]
    async fn test_resolution_failure_is_not_memoized() {
        let mut client = MockAuthenticatedClient::new();
        client
            .expect_post()
            .times(2)
            .returning(|_, _| Ok(ApiResponse::new(503, "unavailable")));
        let resolver = BatchResolver::new(Arc::new(client), Arc::new(MemoryCache::new()));

        let loader = EnvLoader::new(Vec::<String>::new(), ["CLIENT_SECRET"])
            .with_source(source(&[("CLIENT_SECRET", "pvi_2")]))
            .with_resolver(Some(resolver));

        assert!(matches!(
            loader.load().await,
            Err(EnvError::Resolution(ResolutionError::RemoteFetchFailed { .. }))
        ));
        assert!(loader.load().await.is_err());
    }

    #[tokio::test]
    #[serial]
    async fn test_process_env_source() {
        std::env::set_var("CELLAR_TEST_ENV_PRESENT", "value");
        std::env::set_var("CELLAR_TEST_ENV_EMPTY", "");

        assert_eq!(
            ProcessEnv.var("CELLAR_TEST_ENV_PRESENT").as_deref(),
            Some("value")
        );
        assert_eq!(ProcessEnv.var("CELLAR_TEST_ENV_EMPTY"), None);
        assert_eq!(ProcessEnv.var("CELLAR_TEST_ENV_UNSET"), None);

        std::env::remove_var("CELLAR_TEST_ENV_PRESENT");
        std::env::remove_var("CELLAR_TEST_ENV_EMPTY");
    }
}
