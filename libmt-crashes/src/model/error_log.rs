// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::{ExceptionModel, StackFrame};
use chrono::{DateTime, Utc};
use libmt_common::DeviceInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of one thread at crash time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadState {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,
}

/// The durable, serializable record of one crash, managed or native.
///
/// Identity is the `id`: it names the two on-disk artifacts
/// (`<id>.json`, `<id>.throwable`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub app_launch_timestamp: DateTime<Utc>,
    pub fatal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub process_id: u32,
    /// Required by crash processing but not always recoverable; defaults to
    /// an empty string rather than being absent.
    pub process_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    pub error_thread_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_thread_name: Option<String>,
    pub exception: ExceptionModel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub threads: Vec<ThreadState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> CrashLog {
        CrashLog {
            id: Uuid::new_v4(),
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
            app_launch_timestamp: DateTime::from_timestamp_millis(1_699_999_000_000).unwrap(),
            fatal: true,
            user_id: Some("user-1".into()),
            process_id: 4242,
            process_name: "com.example.app".into(),
            architecture: Some("aarch64".into()),
            error_thread_id: 7,
            error_thread_name: Some("main".into()),
            exception: ExceptionModel::new("IllegalState"),
            threads: vec![ThreadState {
                id: 7,
                name: "main".into(),
                frames: vec![],
            }],
            device: None,
        }
    }

    #[test]
    fn test_json_round_trip_preserves_structure() {
        let log = sample_log();
        let json = serde_json::to_string(&log).unwrap();
        let back: CrashLog = serde_json::from_str(&json).unwrap();
        assert_eq!(log, back);
    }

    #[test]
    fn test_transient_minidump_path_serializes_when_present() {
        let mut log = sample_log();
        log.exception = ExceptionModel::minidump("/tmp/a.dmp", "ndk");
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("minidump_file_path"));

        log.exception.minidump_file_path = None;
        let json = serde_json::to_string(&log).unwrap();
        assert!(!json.contains("minidump_file_path"));
    }
}
