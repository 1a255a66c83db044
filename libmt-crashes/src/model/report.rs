// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::CrashLog;
use crate::throwable::Throwable;
use chrono::{DateTime, Utc};
use libmt_common::DeviceInfo;

/// Public-facing, in-memory-only view of a stored crash, handed to listener
/// callbacks and to the "last session" query. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub id: String,
    pub thread_name: Option<String>,
    /// The raw exception as stored on disk. `None` for native crashes and
    /// wrapper-SDK crashes, which intentionally have no throwable object,
    /// and for throwable files that could not be read back.
    pub throwable: Option<Throwable>,
    pub app_start_time: DateTime<Utc>,
    pub app_error_time: DateTime<Utc>,
    pub device: Option<DeviceInfo>,
}

impl ErrorReport {
    pub fn from_log(log: &CrashLog, throwable: Option<Throwable>) -> Self {
        Self {
            id: log.id.to_string(),
            thread_name: log.error_thread_name.clone(),
            throwable,
            app_start_time: log.app_launch_timestamp,
            app_error_time: log.timestamp,
            device: log.device.clone(),
        }
    }

    /// True when this report stands for a native (minidump-backed) crash.
    pub fn is_native_crash(&self) -> bool {
        self.throwable.as_ref().is_some_and(Throwable::is_native_crash)
    }
}
