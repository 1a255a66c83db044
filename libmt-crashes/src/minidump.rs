// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Native crash bridge.
//!
//! Runs at service startup, before managed-crash processing: every file the
//! external native producer dropped into `minidump/new` is converted into
//! the same on-disk crash-log representation managed crashes use, then moved
//! to `minidump/pending` so it is not reprocessed. One bad dump never aborts
//! processing of the remaining dumps.

use crate::model::{CrashLog, ErrorReport, ExceptionModel};
use crate::report_cache::ErrorReportCache;
use crate::storage::ErrorStore;
use crate::throwable::Throwable;
use anyhow::Context;
use chrono::{DateTime, Utc};
use libmt_common::{DeviceInfoSource, SessionHistory};
use std::fs;
use std::path::Path;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Wrapper-SDK marker stamped on logs synthesized from native dumps.
pub const WRAPPER_SDK_NAME_NDK: &str = "mt.ndk";

/// Converts pending native dump files into stored crash logs.
pub(crate) fn process_new_minidumps(
    store: &ErrorStore,
    sessions: &dyn SessionHistory,
    device_source: &dyn DeviceInfoSource,
    user_id: Option<&str>,
) {
    for dump_file in store.new_minidump_files() {
        debug!(path = %dump_file.display(), "Processing pending minidump file");
        let id = Uuid::new_v4();
        if let Err(e) = convert_minidump(store, sessions, device_source, user_id, &dump_file, id) {
            // Reclaim the dump and any partially written artifacts, then
            // keep going with the remaining dumps.
            let _ = fs::remove_file(&dump_file);
            store.remove_stored_error_log_file(id);
            store.remove_stored_throwable_file(id);
            error!(path = %dump_file.display(), error = %e, "Failed to process new minidump file");
        }
    }
}

fn convert_minidump(
    store: &ErrorStore,
    sessions: &dyn SessionHistory,
    device_source: &dyn DeviceInfoSource,
    user_id: Option<&str>,
    dump_file: &Path,
    id: Uuid,
) -> anyhow::Result<()> {
    let modified = fs::metadata(dump_file)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {}", dump_file.display()))?;
    let timestamp: DateTime<Utc> = modified.into();
    let dump_time = timestamp.timestamp_millis();

    let file_name = dump_file
        .file_name()
        .context("Dump file has no file name")?;
    let dest = store.pending_minidump_dir().join(file_name);

    // The model carries a reference to the dump, never its bytes.
    let exception = ExceptionModel::minidump(dest.to_string_lossy(), WRAPPER_SDK_NAME_NDK);

    // Recover the launch time of the session the dump belongs to. Fall back
    // to the dump's own timestamp when session info was lost or the recorded
    // launch time lies in the future relative to the crash.
    let app_launch_timestamp = match sessions.session_at(dump_time) {
        Some(session) if session.app_launch_timestamp <= dump_time => {
            DateTime::from_timestamp_millis(session.app_launch_timestamp).unwrap_or(timestamp)
        }
        _ => timestamp,
    };

    let device = device_source
        .device_info()
        .context("Failed to snapshot device info")?
        .with_wrapper_sdk_name(WRAPPER_SDK_NAME_NDK);

    let log = CrashLog {
        id,
        timestamp,
        app_launch_timestamp,
        fatal: true,
        user_id: user_id.map(str::to_string),
        // Placeholder process identity: the crashed process is gone.
        process_id: 0,
        process_name: String::new(),
        architecture: None,
        error_thread_id: 0,
        error_thread_name: None,
        exception,
        threads: Vec::new(),
        device: Some(device),
    };

    store.write_error_log(&log)?;
    store.write_throwable(id, Some(&Throwable::native_crash()))?;
    fs::rename(dump_file, &dest)
        .with_context(|| format!("Failed to move dump file to {}", dest.display()))?;
    Ok(())
}

/// Materializes the crash report of the last session, if one is stored.
///
/// Repeated zero-length log files are corrupt leftovers: deleted in a loop
/// until a valid candidate remains. Deserialization failure is logged and
/// leaves the last-session report unset.
pub(crate) fn load_last_session_report(
    store: &ErrorStore,
    cache: &mut ErrorReportCache,
) -> Option<ErrorReport> {
    let log_file = loop {
        let candidate = store.last_error_log_file()?;
        match log_file_len(&candidate) {
            Some(0) => {
                warn!(path = %candidate.display(), "Deleting empty error file");
                if fs::remove_file(&candidate).is_err() {
                    // Cannot make progress on an undeletable empty file.
                    return None;
                }
            }
            Some(_) => break candidate,
            // A file that cannot be stat'd is not known to be corrupt;
            // leave it in place and report nothing for this session.
            None => return None,
        }
    };

    debug!("Processing crash report for the last session");
    match store.read_error_log(&log_file) {
        Ok(log) => {
            let report = cache.build(&log, store);
            debug!("Processed crash report for the last session");
            report
        }
        Err(e) => {
            error!(error = %e, "Error parsing last session error log");
            None
        }
    }
}

/// Length of a stored log file; `None` when the file cannot be stat'd.
fn log_file_len(path: &Path) -> Option<u64> {
    match fs::metadata(path) {
        Ok(meta) => Some(meta.len()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to stat error log file");
            None
        }
    }
}
