// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-to-end pipeline scenarios driven through the public API only.

use libmt_common::{InMemorySessionHistory, SessionInfo};
use libmt_crashes::{
    AttachmentLog, CrashChannelLog, Crashes, CrashesConfig, CrashesListener, DeliveryOutcome,
    ErrorReport, LogChannel, Throwable, TransmissionFlags, UserConfirmation, ERROR_GROUP,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, UNIX_EPOCH};

#[derive(Default)]
struct RecordingChannel {
    logs: Mutex<Vec<CrashChannelLog>>,
}

impl RecordingChannel {
    fn error_logs(&self) -> Vec<libmt_crashes::CrashLog> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter_map(|log| match log {
                CrashChannelLog::Error(log) => Some(log.clone()),
                _ => None,
            })
            .collect()
    }

    fn attachments(&self) -> Vec<AttachmentLog> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter_map(|log| match log {
                CrashChannelLog::Attachment(log) => Some(log.clone()),
                _ => None,
            })
            .collect()
    }
}

impl LogChannel for RecordingChannel {
    fn enqueue(&self, log: CrashChannelLog, group: &str, _flags: TransmissionFlags) {
        assert_eq!(group, ERROR_GROUP);
        self.logs.lock().unwrap().push(log);
    }
}

/// Every public call is serialized behind the same worker, so a blocking
/// getter doubles as a queue barrier. Two rounds: a dispatched send
/// decision re-posts its processing onto the worker.
fn flush(service: &Crashes) {
    for _ in 0..2 {
        let _ = service.is_enabled().get();
    }
}

fn start(
    root: &Path,
    channel: Arc<RecordingChannel>,
    listener: Option<Arc<dyn CrashesListener>>,
    sessions: Option<Arc<InMemorySessionHistory>>,
) -> Crashes {
    let mut config = CrashesConfig::new(root, channel as Arc<dyn LogChannel>);
    config.install_panic_hook = false;
    config.listener = listener;
    if let Some(sessions) = sessions {
        config.sessions = sessions;
    }
    Crashes::start(config)
}

#[test]
fn test_crash_roundtrip_across_restart() {
    let dir = tempfile::tempdir().unwrap();

    // First launch: a crash happens, nothing is sent yet.
    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, None);
    flush(&service);
    assert!(!service.has_crashed_in_last_session().get());
    let crash_id = service
        .save_uncaught_exception(Throwable::new("IllegalState", Some("boom".into())))
        .unwrap();
    assert!(channel.error_logs().is_empty());
    drop(service);

    // Second launch: the stored crash is reported and sent.
    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, None);
    flush(&service);

    assert!(service.has_crashed_in_last_session().get());
    let report = service.last_session_crash_report().get().unwrap();
    assert_eq!(report.id, crash_id.to_string());
    assert_eq!(
        report.throwable.as_ref().unwrap().type_name,
        "IllegalState"
    );

    let errors = channel.error_logs();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].id, crash_id);

    // Delivery confirmation finishes the cleanup; a third launch sees a
    // crash-free last session.
    service.on_delivery(
        &CrashChannelLog::Error(errors[0].clone()),
        DeliveryOutcome::Succeeded,
    );
    flush(&service);
    drop(service);

    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, None);
    flush(&service);
    assert!(!service.has_crashed_in_last_session().get());
    assert!(channel.error_logs().is_empty());
}

#[test]
fn test_native_dump_uses_session_launch_time() {
    let dir = tempfile::tempdir().unwrap();

    // The native producer wrote a dump at t=100s; the session that covers it
    // launched at t=40s.
    let sessions = Arc::new(InMemorySessionHistory::new());
    sessions.record(SessionInfo {
        timestamp: 40_000,
        app_launch_timestamp: 40_000,
    });
    let dump_dir = dir
        .path()
        .join("error")
        .join("minidump")
        .join("new");
    fs::create_dir_all(&dump_dir).unwrap();
    let dump = dump_dir.join("crash.dmp");
    fs::write(&dump, b"MDMP").unwrap();
    let file = fs::File::options().write(true).open(&dump).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_millis(100_000))
        .unwrap();
    drop(file);

    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, Some(sessions));
    flush(&service);

    let report = service.last_session_crash_report().get().unwrap();
    assert!(report.is_native_crash());
    assert_eq!(report.app_start_time.timestamp_millis(), 40_000);
    assert_eq!(report.app_error_time.timestamp_millis(), 100_000);

    // The dump travels as an attachment, and its transient path is stripped
    // from the enqueued log.
    let errors = channel.error_logs();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].exception.minidump_file_path, None);
    let attachments = channel.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].data, b"MDMP");
}

#[test]
fn test_confirmation_flow_with_listener_attachments() {
    struct Asking {
        processed: Mutex<Vec<String>>,
    }
    impl CrashesListener for Asking {
        fn should_process(&self, report: &ErrorReport) -> bool {
            self.processed.lock().unwrap().push(report.id.clone());
            true
        }
        fn should_await_user_confirmation(&self) -> bool {
            true
        }
        fn error_attachments(&self, _report: &ErrorReport) -> Option<Vec<AttachmentLog>> {
            Some(vec![AttachmentLog::with_text("context", "notes.txt")])
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, None);
    flush(&service);
    let crash_id = service
        .save_uncaught_exception(Throwable::new("Fatal", None))
        .unwrap();
    drop(service);

    let listener = Arc::new(Asking {
        processed: Mutex::new(Vec::new()),
    });
    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), Some(listener.clone()), None);
    flush(&service);

    // Filtered, but held back awaiting the user's answer.
    assert_eq!(*listener.processed.lock().unwrap(), vec![crash_id.to_string()]);
    assert!(channel.error_logs().is_empty());

    service.notify_user_confirmation(UserConfirmation::Send);
    flush(&service);

    assert_eq!(channel.error_logs().len(), 1);
    let attachments = channel.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].file_name.as_deref(), Some("notes.txt"));
    assert_eq!(attachments[0].error_id, Some(crash_id));
}

#[test]
fn test_disable_discards_everything_until_reenabled() {
    let dir = tempfile::tempdir().unwrap();
    let channel = Arc::new(RecordingChannel::default());
    let service = start(dir.path(), channel.clone(), None, None);
    flush(&service);
    service
        .save_uncaught_exception(Throwable::new("Fatal", None))
        .unwrap();

    service.set_enabled(false).get();
    assert!(service.new_minidump_directory().get().is_none());
    service.track_exception(Throwable::new("Handled", None), None);
    flush(&service);
    assert!(channel.logs.lock().unwrap().is_empty());

    service.set_enabled(true).get();
    assert!(service.is_enabled().get());
    // The stored crash was wiped by the disable, nothing to replay.
    assert!(!service.has_crashed_in_last_session().get());
    assert!(channel.error_logs().is_empty());
    assert!(service.new_minidump_directory().get().is_some());
}
