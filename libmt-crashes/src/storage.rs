// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! On-disk persistence of crash artifacts.
//!
//! The store owns one error-storage directory holding, per crash id, a JSON
//! error-log file and a serialized-throwable (or zero-byte placeholder)
//! file, plus the `minidump/new` and `minidump/pending` directories used by
//! the native crash bridge. Read failures and corrupt content are reported
//! to the caller or logged and treated as absence; they never escape the
//! service's public API.

use crate::model::CrashLog;
use crate::throwable::Throwable;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Error log file extension for the JSON schema.
pub const ERROR_LOG_FILE_EXTENSION: &str = ".json";

/// File extension for the serialized throwable kept for client-side
/// inspection. A zero-byte file of this extension is a placeholder marking
/// that report construction was attempted without a throwable object.
pub const THROWABLE_FILE_EXTENSION: &str = ".throwable";

const ERROR_DIRECTORY: &str = "error";
const MINIDUMP_DIRECTORY: &str = "minidump";
const NEW_MINIDUMP_DIRECTORY: &str = "new";
const PENDING_MINIDUMP_DIRECTORY: &str = "pending";

pub struct ErrorStore {
    root: PathBuf,
    error_dir: OnceLock<PathBuf>,
    new_minidump_dir: OnceLock<PathBuf>,
    pending_minidump_dir: OnceLock<PathBuf>,
}

impl ErrorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            error_dir: OnceLock::new(),
            new_minidump_dir: OnceLock::new(),
            pending_minidump_dir: OnceLock::new(),
        }
    }

    /// Root directory for error log and throwable files. Created once,
    /// memoized for the lifetime of the store.
    pub fn error_dir(&self) -> &Path {
        self.error_dir
            .get_or_init(|| Self::create_dir(self.root.join(ERROR_DIRECTORY)))
    }

    /// Directory where the external native producer drops new dump files.
    pub fn new_minidump_dir(&self) -> &Path {
        self.new_minidump_dir.get_or_init(|| {
            Self::create_dir(
                self.root
                    .join(ERROR_DIRECTORY)
                    .join(MINIDUMP_DIRECTORY)
                    .join(NEW_MINIDUMP_DIRECTORY),
            )
        })
    }

    /// Directory for dumps claimed by the bridge and awaiting send.
    pub fn pending_minidump_dir(&self) -> &Path {
        self.pending_minidump_dir.get_or_init(|| {
            Self::create_dir(
                self.root
                    .join(ERROR_DIRECTORY)
                    .join(MINIDUMP_DIRECTORY)
                    .join(PENDING_MINIDUMP_DIRECTORY),
            )
        })
    }

    fn create_dir(path: PathBuf) -> PathBuf {
        if let Err(e) = fs::create_dir_all(&path) {
            // Writes into the directory will surface the failure.
            error!(path = %path.display(), error = %e, "Failed to create storage directory");
        }
        path
    }

    /// Serializes the crash log to its JSON artifact.
    pub fn write_error_log(&self, log: &CrashLog) -> anyhow::Result<PathBuf> {
        let path = self
            .error_dir()
            .join(format!("{}{ERROR_LOG_FILE_EXTENSION}", log.id));
        let contents = serde_json::to_string(log).context("Failed to serialize crash log")?;
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Reads a crash log back. Unparsable content is an error; the caller
    /// treats the file as corrupt, logs, and deletes it.
    pub fn read_error_log(&self, path: &Path) -> anyhow::Result<CrashLog> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Writes the throwable artifact for `id`. A missing throwable, or one
    /// whose serialization fails, yields the zero-byte placeholder: the JSON
    /// crash log was already written, and losing the throwable must never
    /// lose the structured report.
    pub fn write_throwable(&self, id: Uuid, throwable: Option<&Throwable>) -> anyhow::Result<PathBuf> {
        let path = self
            .error_dir()
            .join(format!("{id}{THROWABLE_FILE_EXTENSION}"));
        if let Some(throwable) = throwable {
            match throwable.to_bytes() {
                Ok(bytes) => {
                    fs::write(&path, bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    return Ok(path);
                }
                Err(e) => {
                    error!(id = %id, error = %e, "Failed to store throwable, keeping placeholder");
                    let _ = fs::remove_file(&path);
                }
            }
        }
        fs::write(&path, [])
            .with_context(|| format!("Failed to write placeholder {}", path.display()))?;
        Ok(path)
    }

    /// Reads the throwable artifact. The empty placeholder and any
    /// unreadable or undecodable content all resolve to `None`.
    pub fn read_throwable(&self, path: &Path) -> Option<Throwable> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Cannot read throwable file");
                return None;
            }
        };
        if bytes.is_empty() {
            return None;
        }
        match Throwable::from_bytes(&bytes) {
            Ok(throwable) => Some(throwable),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Cannot decode throwable file");
                None
            }
        }
    }

    /// All stored crash-log files, sorted by file name for deterministic
    /// processing order.
    pub fn stored_error_log_files(&self) -> Vec<PathBuf> {
        let mut files = self.files_with_suffix(self.error_dir(), ERROR_LOG_FILE_EXTENSION);
        files.sort();
        files
    }

    /// All dump files the native producer has dropped since last startup.
    pub fn new_minidump_files(&self) -> Vec<PathBuf> {
        let mut files = self.files_with_suffix(self.new_minidump_dir(), "");
        files.sort();
        files
    }

    /// The most recently modified stored crash-log file, if any.
    pub fn last_error_log_file(&self) -> Option<PathBuf> {
        self.files_with_suffix(self.error_dir(), ERROR_LOG_FILE_EXTENSION)
            .into_iter()
            .filter_map(|path| {
                let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some((modified, path))
            })
            .max_by_key(|(modified, _)| *modified)
            .map(|(_, path)| path)
    }

    pub fn stored_error_log_file(&self, id: Uuid) -> Option<PathBuf> {
        self.stored_file(id, ERROR_LOG_FILE_EXTENSION)
    }

    pub fn stored_throwable_file(&self, id: Uuid) -> Option<PathBuf> {
        self.stored_file(id, THROWABLE_FILE_EXTENSION)
    }

    pub fn remove_stored_error_log_file(&self, id: Uuid) {
        if let Some(path) = self.stored_error_log_file(id) {
            info!(path = %path.display(), "Deleting error log file");
            Self::delete(&path);
        }
    }

    pub fn remove_stored_throwable_file(&self, id: Uuid) {
        if let Some(path) = self.stored_throwable_file(id) {
            info!(path = %path.display(), "Deleting throwable file");
            Self::delete(&path);
        }
    }

    /// Deletes every entry in the error-storage directory. Used when the
    /// service is disabled.
    pub fn delete_all_files(&self) {
        let Ok(entries) = fs::read_dir(self.error_dir()) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(e) = result {
                warn!(path = %path.display(), error = %e, "Failed to delete file");
            }
        }
        info!("Deleted crashes local files");
        // Keep the minidump layout in place for the external producer.
        for dir in [self.new_minidump_dir(), self.pending_minidump_dir()] {
            if let Err(e) = fs::create_dir_all(dir) {
                error!(path = %dir.display(), error = %e, "Failed to recreate minidump directory");
            }
        }
    }

    fn delete(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to delete file");
        }
    }

    /// Files in `dir` whose name ends with `suffix` (any file for an empty
    /// suffix). Prefix lookups by id go through [`Self::stored_file`].
    fn files_with_suffix(&self, dir: &Path, suffix: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
            .map(|entry| entry.path())
            .collect()
    }

    fn stored_file(&self, id: Uuid, suffix: &str) -> Option<PathBuf> {
        let prefix = id.to_string();
        self.files_with_suffix(self.error_dir(), suffix)
            .into_iter()
            .find(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
    }
}
