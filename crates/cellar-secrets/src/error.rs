//! Error types for secret resolution

use crate::types::SecretId;
use crate::wire::{ItemState, VersionState};
use thiserror::Error;

/// Why a resolution failed. Every variant names the logical secrets affected.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The single remote round trip failed: transport error, non-2xx status or
    /// an undecodable body
    #[error("Failed to fetch vault secrets for {}: {detail}", .names.join(", "))]
    RemoteFetchFailed {
        names: Vec<String>,
        status: Option<u16>,
        detail: String,
    },

    /// A returned record is disabled or its current version is not active
    #[error(
        "Secret(s) {} (id {id}) are in an inactive state \
         (item {item_state}, version {version_state}); re-enable them in the vault",
        .names.join(", ")
    )]
    RecordInactive {
        names: Vec<String>,
        id: SecretId,
        item_state: ItemState,
        version_state: VersionState,
    },

    /// The vault did not return a record for some requested identifiers
    #[error("Secret(s) {} do not exist in the vault", .names.join(", "))]
    RecordMissing { names: Vec<String> },
}

impl ResolutionError {
    /// Logical names this error is about
    pub fn names(&self) -> &[String] {
        match self {
            ResolutionError::RemoteFetchFailed { names, .. }
            | ResolutionError::RecordInactive { names, .. }
            | ResolutionError::RecordMissing { names } => names,
        }
    }
}

/// Failures of the authenticated HTTP transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid vault configuration: {0}")]
    Config(#[from] cellar_core::Error),

    #[error("Invalid vault URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request to {path} failed after {attempts} attempt(s): {source}")]
    Request {
        path: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {path} was not attempted (retry policy allows zero attempts)")]
    NotAttempted { path: String },
}
