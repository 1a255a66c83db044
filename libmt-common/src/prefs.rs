// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Durable key-value preference storage.
//!
//! Backs the persisted flags that must outlive process restarts (service
//! enabled state, the crash "always send" consent). Values are kept in a
//! single JSON document rewritten on every mutation; preferences are small
//! and mutated rarely, so no journaling is attempted.

use anyhow::Context;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, warn};

pub struct PreferenceStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl PreferenceStore {
    /// Opens the store at `path`, loading any previously persisted values.
    /// An unreadable or unparsable file is treated as empty: preferences
    /// must never prevent the owning service from starting.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unparsable preference file");
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.lock() {
            Ok(values) => values.get(key).and_then(Value::as_bool).unwrap_or(default),
            Err(_) => default,
        }
    }

    pub fn put_bool(&self, key: &str, value: bool) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), Value::Bool(value));
            if let Err(e) = Self::persist(&self.path, &values) {
                error!(key, error = %e, "Failed to persist preference");
            }
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            if values.remove(key).is_some() {
                if let Err(e) = Self::persist(&self.path, &values) {
                    error!(key, error = %e, "Failed to persist preference removal");
                }
            }
        }
    }

    fn persist(path: &PathBuf, values: &Map<String, Value>) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string(values)?;
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.json"));
        assert!(!store.get_bool("always_send", false));
        assert!(store.get_bool("enabled", true));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = PreferenceStore::open(&path);
        store.put_bool("always_send", true);
        drop(store);

        let reopened = PreferenceStore::open(&path);
        assert!(reopened.get_bool("always_send", false));
    }

    #[test]
    fn test_remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = PreferenceStore::open(&path);
        store.put_bool("always_send", true);
        store.remove("always_send");
        assert!(!store.get_bool("always_send", false));

        let reopened = PreferenceStore::open(&path);
        assert!(!reopened.get_bool("always_send", false));
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();
        let store = PreferenceStore::open(&path);
        assert!(!store.get_bool("always_send", false));
        store.put_bool("always_send", true);
        assert!(store.get_bool("always_send", false));
    }
}
