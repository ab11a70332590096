//! Request and result mappings for a resolution
//!
//! A [`SecretRequest`] maps caller-facing names to vault identifiers. Names
//! are unique; several names may point at the same identifier. The resolver
//! answers with [`ResolvedSecrets`], which holds exactly one value per
//! requested name and can only be built inside this crate.

use crate::security::SecureString;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a secret record in the remote vault
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretId(String);

impl SecretId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SecretId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SecretId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SecretId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Name → identifier mapping handed to the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretRequest {
    entries: BTreeMap<String, SecretId>,
}

impl SecretRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a name, returning the identifier it previously mapped to
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<SecretId>) -> Option<SecretId> {
        self.entries.insert(name.into(), id.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, id: impl Into<SecretId>) -> Self {
        self.insert(name, id);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SecretId> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecretId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Inverse mapping: each distinct identifier with every name that wants it
    pub(crate) fn names_by_id(&self) -> BTreeMap<&SecretId, Vec<&str>> {
        let mut index: BTreeMap<&SecretId, Vec<&str>> = BTreeMap::new();
        for (name, id) in &self.entries {
            index.entry(id).or_default().push(name.as_str());
        }
        index
    }
}

impl<N, I> FromIterator<(N, I)> for SecretRequest
where
    N: Into<String>,
    I: Into<SecretId>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut request = SecretRequest::new();
        for (name, id) in iter {
            request.insert(name, id);
        }
        request
    }
}

/// Name → secret value mapping produced by a successful resolution
#[derive(Debug, Clone, Default)]
pub struct ResolvedSecrets {
    values: BTreeMap<String, SecureString>,
}

impl ResolvedSecrets {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, value: SecureString) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&SecureString> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SecureString)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_inner(self) -> BTreeMap<String, SecureString> {
        self.values
    }
}

impl IntoIterator for ResolvedSecrets {
    type Item = (String, SecureString);
    type IntoIter = btree_map::IntoIter<String, SecureString>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_by_id_groups_aliases() {
        let request = SecretRequest::new()
            .with("A", "id1")
            .with("B", "id1")
            .with("C", "id2");

        let index = request.names_by_id();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&SecretId::from("id1")], vec!["A", "B"]);
        assert_eq!(index[&SecretId::from("id2")], vec!["C"]);
    }

    #[test]
    fn test_insert_replaces_name() {
        let mut request = SecretRequest::new();
        assert!(request.insert("A", "id1").is_none());
        assert_eq!(request.insert("A", "id2"), Some(SecretId::from("id1")));
        assert_eq!(request.len(), 1);
        assert_eq!(request.get("A"), Some(&SecretId::from("id2")));
    }

    #[test]
    fn test_request_deserializes_from_mapping() {
        let request: SecretRequest =
            serde_json::from_str(r#"{"DB_PASSWORD": "pvi_1", "API_KEY": "pvi_2"}"#).unwrap();
        assert_eq!(request.len(), 2);
        assert_eq!(request.get("API_KEY").map(SecretId::as_str), Some("pvi_2"));
    }

    #[test]
    fn test_request_from_iterator() {
        let request: SecretRequest = [("A", "id1"), ("B", "id2")].into_iter().collect();
        assert_eq!(request.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_resolved_secrets_debug_is_redacted() {
        let mut resolved = ResolvedSecrets::new();
        resolved.insert("A", SecureString::from("s1"));
        let debug = format!("{:?}", resolved);
        assert!(debug.contains("REDACTED"));
    }
}
