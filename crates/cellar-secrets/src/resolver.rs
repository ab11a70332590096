//! Batch resolution of logical secret names against the cache and vault
//!
//! A resolution deduplicates identifiers, answers what it can from the cache,
//! fetches everything else in a single `/v1/list` round trip, validates the
//! lifecycle state of every returned record and writes usable values back to
//! the cache. It either produces a value for every requested name or fails.

use crate::cache::SecretCache;
use crate::error::ResolutionError;
use crate::security::SecureString;
use crate::transport::{ApiResponse, AuthenticatedClient};
use crate::types::{ResolvedSecrets, SecretId, SecretRequest};
use crate::wire::{
    ApiEnvelope, GetRequest, ListRequest, ListResult, SecretItem, GET_PATH, LIST_PATH,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves [`SecretRequest`]s through a shared cache and an authenticated client
#[derive(Clone)]
pub struct BatchResolver {
    client: Arc<dyn AuthenticatedClient>,
    cache: Arc<dyn SecretCache>,
}

impl fmt::Debug for BatchResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchResolver").finish_non_exhaustive()
    }
}

impl BatchResolver {
    pub fn new(client: Arc<dyn AuthenticatedClient>, cache: Arc<dyn SecretCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<dyn SecretCache> {
        &self.cache
    }

    /// Resolve every name in `request` to its current secret value
    pub async fn resolve(
        &self,
        request: &SecretRequest,
    ) -> Result<ResolvedSecrets, ResolutionError> {
        let mut resolved = ResolvedSecrets::new();
        let mut pending: BTreeMap<&SecretId, Vec<&str>> = BTreeMap::new();

        for (id, names) in request.names_by_id() {
            match self.cached(id) {
                Some(value) => {
                    debug!("Cache hit for {} ({} name(s))", id, names.len());
                    fan_out(&mut resolved, &names, &value);
                }
                None => {
                    pending.insert(id, names);
                }
            }
        }

        if pending.is_empty() {
            debug!("All {} secret(s) served from cache", resolved.len());
            return Ok(resolved);
        }

        debug!("Fetching {} identifier(s) from vault", pending.len());
        let body = ListRequest::for_ids(pending.keys().copied());
        let response = self.post(LIST_PATH, &body, || all_names(&pending)).await?;
        let envelope: ApiEnvelope<ListResult> =
            response
                .json()
                .map_err(|e| ResolutionError::RemoteFetchFailed {
                    names: all_names(&pending),
                    status: Some(response.status),
                    detail: format!("invalid response body: {}", e),
                })?;
        let items = envelope.result.items;

        // Nothing is written to the cache unless every returned record is usable
        for item in &items {
            match pending.get(&item.id) {
                None => warn!("Ignoring unrequested record {} in vault response", item.id),
                Some(names) if !item.is_usable() => return Err(inactive(names, item)),
                Some(_) => {}
            }
        }

        let mut fetched = 0;
        for item in items {
            let Some(names) = pending.remove(&item.id) else {
                continue;
            };
            let value = item.current_version.secret;
            fan_out(&mut resolved, &names, &value);
            self.cache.set(&item.id, value);
            fetched += 1;
        }
        info!("Fetched {} secret(s) from vault", fetched);

        if !pending.is_empty() {
            return Err(ResolutionError::RecordMissing {
                names: all_names(&pending),
            });
        }

        Ok(resolved)
    }

    /// Fetch a single identifier through `/v1/get`, consulting the cache first
    pub async fn fetch_service_token(
        &self,
        id: &SecretId,
    ) -> Result<SecureString, ResolutionError> {
        if let Some(value) = self.cached(id) {
            debug!("Cache hit for {}", id);
            return Ok(value);
        }

        let names = || vec![id.to_string()];
        let response = self.post(GET_PATH, &GetRequest { id }, names).await?;
        let envelope: ApiEnvelope<SecretItem> =
            response
                .json()
                .map_err(|e| ResolutionError::RemoteFetchFailed {
                    names: names(),
                    status: Some(response.status),
                    detail: format!("invalid response body: {}", e),
                })?;
        let item = envelope.result;

        if item.id != *id {
            warn!("Vault returned record {} when asked for {}", item.id, id);
            return Err(ResolutionError::RecordMissing { names: names() });
        }
        if !item.is_usable() {
            return Err(inactive(&[id.as_str()], &item));
        }

        let value = item.current_version.secret;
        self.cache.set(id, value.clone());
        Ok(value)
    }

    /// Only non-empty cached values count as present
    fn cached(&self, id: &SecretId) -> Option<SecureString> {
        self.cache.get(id).filter(|value| !value.is_empty())
    }

    /// Issue one request, mapping every failure and non-2xx status to
    /// `RemoteFetchFailed` for the names produced by `names`
    async fn post<B, N>(
        &self,
        path: &str,
        body: &B,
        names: N,
    ) -> Result<ApiResponse, ResolutionError>
    where
        B: Serialize,
        N: Fn() -> Vec<String>,
    {
        let body = serde_json::to_value(body).map_err(|e| ResolutionError::RemoteFetchFailed {
            names: names(),
            status: None,
            detail: format!("failed to encode request: {}", e),
        })?;

        let response = self
            .client
            .post(path, &body)
            .await
            .map_err(|e| ResolutionError::RemoteFetchFailed {
                names: names(),
                status: None,
                detail: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(ResolutionError::RemoteFetchFailed {
                names: names(),
                status: Some(response.status),
                detail: response.body,
            });
        }

        Ok(response)
    }
}

fn fan_out(resolved: &mut ResolvedSecrets, names: &[&str], value: &SecureString) {
    for name in names {
        resolved.insert(name, value.clone());
    }
}

fn all_names(pending: &BTreeMap<&SecretId, Vec<&str>>) -> Vec<String> {
    let mut names: Vec<String> = pending
        .values()
        .flatten()
        .map(|name| name.to_string())
        .collect();
    names.sort();
    names
}

fn inactive(names: &[&str], item: &SecretItem) -> ResolutionError {
    ResolutionError::RecordInactive {
        names: names.iter().map(|name| name.to_string()).collect(),
        id: item.id.clone(),
        item_state: item.item_state.clone(),
        version_state: item.current_version.state.clone(),
    }
}
