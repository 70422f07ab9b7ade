//! Local state file.
//!
//! `StateStore` maps resource addresses to the last state a successful remote call produced. Callers only
//! `put` or `remove` after the API accepted the change, so a failed write
//! leaves the file exactly as it was.
//!
//! The file is plain JSON and is rewritten atomically on `save` (write to
//! a sibling temp file, then rename).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ResourceKind;

/// Default location of the state file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "baselime.state.json";

const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access state file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("State file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("State for {address} cannot be decoded: {source}")]
    Entry {
        address: String,
        source: serde_json::Error,
    },

    #[error("Unsupported state file version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub kind: ResourceKind,
    pub attributes: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    resources: BTreeMap<String, StateEntry>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: StateFile,
}

impl StateStore {
    /// Load the state file at `path`. A missing file is an empty state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let state = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StateFile>(&bytes).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => StateFile::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        if state.version != STATE_FORMAT_VERSION {
            return Err(StoreError::Version {
                found: state.version,
                expected: STATE_FORMAT_VERSION,
            });
        }

        tracing::debug!(
            path = %path.display(),
            resources = state.resources.len(),
            "state loaded"
        );

        Ok(Self { path, state })
    }

    /// Address of a resource: `baselime_query.lambda-errors`, or
    /// `baselime_alert.checkout/too-many-errors` for service-scoped kinds.
    pub fn address(kind: ResourceKind, key: &str) -> String {
        format!("{}.{}", kind.type_name(), key)
    }

    pub fn get(&self, kind: ResourceKind, key: &str) -> Option<&StateEntry> {
        self.state.resources.get(&Self::address(kind, key))
    }

    /// State keys tracked for one resource kind.
    pub fn keys(&self, kind: ResourceKind) -> impl Iterator<Item = &str> + '_ {
        let prefix = format!("{}.", kind.type_name());
        self.state
            .resources
            .keys()
            .filter_map(move |address| address.strip_prefix(prefix.as_str()))
    }

    /// Decode the stored attributes for `kind.key` into a model.
    pub fn get_as<M: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        key: &str,
    ) -> Result<Option<M>, StoreError> {
        let address = Self::address(kind, key);
        match self.state.resources.get(&address) {
            None => Ok(None),
            Some(entry) => serde_json::from_value(entry.attributes.clone())
                .map(Some)
                .map_err(|source| StoreError::Entry { address, source }),
        }
    }

    pub fn put<M: Serialize>(
        &mut self,
        kind: ResourceKind,
        key: &str,
        model: &M,
    ) -> Result<(), StoreError> {
        let address = Self::address(kind, key);
        let attributes = serde_json::to_value(model).map_err(|source| StoreError::Entry {
            address: address.clone(),
            source,
        })?;

        self.state.resources.insert(
            address,
            StateEntry {
                kind,
                attributes,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    pub fn remove(&mut self, kind: ResourceKind, key: &str) -> Option<StateEntry> {
        self.state.resources.remove(&Self::address(kind, key))
    }

    /// Addresses currently tracked, in sorted order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.state.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.state.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.resources.is_empty()
    }

    /// Persist the state to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let bytes = serde_json::to_vec_pretty(&self.state).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_opens_empty() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty());
    }

    #[test]
    fn put_and_get_use_typed_address() {
        let (_dir, mut store) = temp_store();
        store
            .put(ResourceKind::Query, "errors", &json!({ "name": "errors" }))
            .unwrap();

        assert_eq!(
            store.addresses().collect::<Vec<_>>(),
            vec!["baselime_query.errors"]
        );
        assert!(store.get(ResourceKind::Alert, "errors").is_none());

        let value: serde_json::Value = store
            .get_as(ResourceKind::Query, "errors")
            .unwrap()
            .unwrap();
        assert_eq!(value["name"], "errors");
    }

    #[test]
    fn same_name_in_two_services_is_tracked_separately() {
        let (_dir, mut store) = temp_store();
        store
            .put(ResourceKind::Alert, "checkout/errors", &json!({ "service": "checkout" }))
            .unwrap();
        store
            .put(ResourceKind::Alert, "billing/errors", &json!({ "service": "billing" }))
            .unwrap();
        store.put(ResourceKind::Query, "errors", &json!({})).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.keys(ResourceKind::Alert).collect::<Vec<_>>(),
            vec!["billing/errors", "checkout/errors"]
        );
        assert_eq!(store.keys(ResourceKind::Query).collect::<Vec<_>>(), vec!["errors"]);
    }

    #[test]
    fn save_then_open_restores_entries() {
        let (dir, mut store) = temp_store();
        store
            .put(ResourceKind::Dashboard, "overview", &json!({ "widgets": [] }))
            .unwrap();
        store.save().unwrap();

        let reopened = StateStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.get(ResourceKind::Dashboard, "overview"),
            store.get(ResourceKind::Dashboard, "overview")
        );
    }

    #[test]
    fn remove_drops_entry() {
        let (_dir, mut store) = temp_store();
        store.put(ResourceKind::Alert, "a", &json!({})).unwrap();
        assert!(store.remove(ResourceKind::Alert, "a").is_some());
        assert!(store.remove(ResourceKind::Alert, "a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"not json").unwrap();

        assert!(matches!(
            StateStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, br#"{ "version": 99, "resources": {} }"#).unwrap();

        assert!(matches!(
            StateStore::open(&path),
            Err(StoreError::Version { found: 99, .. })
        ));
    }
}
