// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::{CrashLog, ErrorReport};
use crate::storage::ErrorStore;
use std::collections::HashMap;
use uuid::Uuid;

/// A stored crash log paired with its public report view.
#[derive(Debug, Clone)]
pub(crate) struct ErrorLogReport {
    pub log: CrashLog,
    pub report: ErrorReport,
}

/// Memoizes [`ErrorReport`] construction by crash id so that repeated
/// channel callbacks for the same crash observe one report instance until
/// it is invalidated (delivery success/failure, or service disable).
#[derive(Debug, Default)]
pub(crate) struct ErrorReportCache {
    entries: HashMap<Uuid, ErrorLogReport>,
}

impl ErrorReportCache {
    /// Builds (or returns the cached) report for `log`.
    ///
    /// A cache hit is refreshed with the device info of the passed-in log: a
    /// later pipeline stage may attach device info after the report was
    /// first built. Returns `None` when the throwable file for the id is
    /// gone, which the caller must treat as "this crash is gone" and reclaim
    /// the remaining artifacts. An unreadable or placeholder throwable still
    /// yields a report, just without a throwable object.
    pub fn build(&mut self, log: &CrashLog, store: &ErrorStore) -> Option<ErrorReport> {
        if let Some(entry) = self.entries.get_mut(&log.id) {
            entry.report.device = log.device.clone();
            return Some(entry.report.clone());
        }
        let file = store.stored_throwable_file(log.id)?;
        let throwable = store.read_throwable(&file);
        let report = ErrorReport::from_log(log, throwable);
        self.entries.insert(
            log.id,
            ErrorLogReport {
                log: log.clone(),
                report: report.clone(),
            },
        );
        Some(report)
    }

    pub fn remove(&mut self, id: Uuid) {
        self.entries.remove(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.contains_key(&id)
    }
}
