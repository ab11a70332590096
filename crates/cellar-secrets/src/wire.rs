//! JSON shapes exchanged with the vault service

use crate::security::SecureString;
use crate::types::SecretId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint listing records filtered by identifier
pub const LIST_PATH: &str = "/v1/list";

/// Endpoint fetching a single record
pub const GET_PATH: &str = "/v1/get";

/// Body of a `/v1/list` request
#[derive(Debug, Serialize)]
pub struct ListRequest<'a> {
    pub filter: IdFilter<'a>,
    pub include_secrets: bool,
}

#[derive(Debug, Serialize)]
pub struct IdFilter<'a> {
    #[serde(rename = "id__in")]
    pub id_in: Vec<&'a SecretId>,
}

impl<'a> ListRequest<'a> {
    /// Request the given identifiers with their secret values included
    pub fn for_ids(ids: impl IntoIterator<Item = &'a SecretId>) -> Self {
        Self {
            filter: IdFilter {
                id_in: ids.into_iter().collect(),
            },
            include_secrets: true,
        }
    }
}

/// Body of a `/v1/get` request
#[derive(Debug, Serialize)]
pub struct GetRequest<'a> {
    pub id: &'a SecretId,
}

/// Every successful response wraps its payload in `result`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub result: T,
}

#[derive(Debug, Deserialize)]
pub struct ListResult {
    #[serde(default)]
    pub items: Vec<SecretItem>,
}

/// A secret record as returned by the vault
#[derive(Debug, Deserialize)]
pub struct SecretItem {
    pub id: SecretId,
    pub item_state: ItemState,
    pub current_version: SecretVersion,
}

impl SecretItem {
    /// Usable only when the item is enabled and its current version active
    pub fn is_usable(&self) -> bool {
        self.item_state == ItemState::Enabled && self.current_version.state == VersionState::Active
    }
}

#[derive(Debug, Deserialize)]
pub struct SecretVersion {
    pub secret: SecureString,
    pub state: VersionState,
}

/// Lifecycle of a vault item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ItemState {
    Enabled,
    Disabled,
    Other(String),
}

impl From<String> for ItemState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "enabled" => ItemState::Enabled,
            "disabled" => ItemState::Disabled,
            _ => ItemState::Other(state),
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Enabled => f.write_str("enabled"),
            ItemState::Disabled => f.write_str("disabled"),
            ItemState::Other(state) => f.write_str(state),
        }
    }
}

/// Lifecycle of a secret version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum VersionState {
    Active,
    Deactivated,
    Suspended,
    Compromised,
    Destroyed,
    Other(String),
}

impl From<String> for VersionState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "active" => VersionState::Active,
            "deactivated" => VersionState::Deactivated,
            "suspended" => VersionState::Suspended,
            "compromised" => VersionState::Compromised,
            "destroyed" => VersionState::Destroyed,
            _ => VersionState::Other(state),
        }
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionState::Active => f.write_str("active"),
            VersionState::Deactivated => f.write_str("deactivated"),
            VersionState::Suspended => f.write_str("suspended"),
            VersionState::Compromised => f.write_str("compromised"),
            VersionState::Destroyed => f.write_str("destroyed"),
            VersionState::Other(state) => f.write_str(state),
        }
    }
}
