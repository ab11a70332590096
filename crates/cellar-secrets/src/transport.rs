//! Authenticated HTTP transport to the vault service

use crate::error::TransportError;
use crate::security::SecureString;
use async_trait::async_trait;
use cellar_core::retry::{
    HttpStatusError, HttpStatusPredicate, Retrier, RetryError, TracingObserver,
};
use cellar_core::types::{NetworkConfig, RetryPolicy, RuntimeConfig};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Status and raw body of a completed request
#[derive(Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

// Bodies of successful responses carry secret values
impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Capability to issue an authenticated JSON POST against the vault
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticatedClient: Send + Sync {
    async fn post(&self, path: &str, body: &serde_json::Value)
        -> Result<ApiResponse, TransportError>;
}

/// Failure of a single attempt, as seen by the retry engine
#[derive(Debug)]
enum AttemptError {
    Status(ApiResponse),
    Request(reqwest::Error),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Status(resp) => write!(f, "HTTP {}", resp.status),
            AttemptError::Request(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AttemptError {}

impl HttpStatusError for AttemptError {
    fn status_code(&self) -> Option<u16> {
        match self {
            AttemptError::Status(resp) => Some(resp.status),
            AttemptError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// `reqwest` backed [`AuthenticatedClient`] with bearer auth and retries
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    token: SecureString,
    predicate: HttpStatusPredicate,
    retrier: Retrier<HttpStatusPredicate, TracingObserver>,
}

impl HttpClient {
    /// Build a client for the vault described by `config`
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, TransportError> {
        config.vault.validate()?;
        let token = config
            .vault
            .token
            .clone()
            .ok_or_else(|| cellar_core::Error::missing_field("vault.token"))?;

        Self::new(
            &config.vault.base_url(),
            SecureString::new(token),
            &config.network,
            config.retry.clone(),
        )
    }

    pub fn new(
        base_url: &str,
        token: SecureString,
        network: &NetworkConfig,
        policy: RetryPolicy,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|source| TransportError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let client = reqwest::Client::builder()
            .user_agent(network.user_agent.as_str())
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()
            .map_err(TransportError::Build)?;

        let predicate = HttpStatusPredicate::default();
        let retrier = Retrier::new(policy, predicate.clone())
            .with_observer(TracingObserver::new("vault request"));

        Ok(Self {
            client,
            base_url,
            token,
            predicate,
            retrier,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send_once(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, AttemptError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(self.token.as_str())
            .json(body)
            .send()
            .await
            .map_err(AttemptError::Request)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(AttemptError::Request)?;
        let response = ApiResponse::new(status, body);

        if self.predicate.is_retryable_code(status) {
            Err(AttemptError::Status(response))
        } else {
            Ok(response)
        }
    }
}

#[async_trait]
impl AuthenticatedClient for HttpClient {
    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| TransportError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })?;

        debug!("POST {}", url);

        match self.retrier.run(|| self.send_once(&url, body)).await {
            Ok(response) => Ok(response),
            // Out of attempts on a transient status: hand back the last response
            Err(RetryError::Exhausted {
                last: AttemptError::Status(response),
                ..
            })
            | Err(RetryError::Permanent {
                error: AttemptError::Status(response),
                ..
            }) => Ok(response),
            Err(RetryError::Exhausted {
                attempts,
                last: AttemptError::Request(source),
                ..
            }) => Err(TransportError::Request {
                path: path.to_string(),
                attempts,
                source,
            }),
            Err(RetryError::Permanent {
                attempt,
                error: AttemptError::Request(source),
            }) => Err(TransportError::Request {
                path: path.to_string(),
                attempts: attempt,
                source,
            }),
            Err(RetryError::NoAttempts) => Err(TransportError::NotAttempted {
                path: path.to_string(),
            }),
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("policy", self.retrier.policy())
            .finish_non_exhaustive()
    }
}
