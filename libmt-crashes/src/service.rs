// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The crash service: capture, confirmation, and hand-off to the channel.
//!
//! All state mutation is serialized on one background worker; listener
//! callbacks run on the configured dispatcher, never under the service
//! lock. Public calls return immediately, observation goes through
//! [`ServiceFuture`] handles.

use crate::channel::{
    CrashChannelLog, DeliveryOutcome, LogChannel, TransmissionFlags, ERROR_GROUP,
};
use crate::listener::{CrashesListener, NoopCrashesListener};
use crate::minidump;
use crate::model::{
    AttachmentLog, CrashLog, ErrorReport, ExceptionModel, ThreadState, CONTENT_TYPE_BINARY,
    MINIDUMP_FILE_NAME,
};
use crate::properties::validate_properties;
use crate::report_cache::{ErrorLogReport, ErrorReportCache};
use crate::storage::ErrorStore;
use crate::throwable::Throwable;
use crate::uncaught::UncaughtExceptionHandler;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use libmt_common::{
    threading, DeviceInfoSource, Dispatcher, HostDeviceInfoSource, InMemorySessionHistory,
    InlineDispatcher, PreferenceStore, SerialWorker, ServiceFuture, SessionHistory,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::{fs, mem};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Preference key for the persisted enabled state.
pub const PREF_KEY_ENABLED: &str = "crashes.enabled";

/// Preference key for the persisted "always send" consent.
pub const PREF_KEY_ALWAYS_SEND: &str = "crashes.always_send";

/// Max number of attachments accepted per crash report without a warning.
pub const MAX_ATTACHMENT_PER_CRASH: usize = 2;

/// Log type name used when validating handled-error properties.
const HANDLED_ERROR_LOG_TYPE: &str = "HandledError";

const WORKER_NAME: &str = "mt-crashes";
const PREFERENCES_FILE: &str = "preferences.json";

/// The user's answer to the send-confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConfirmation {
    /// Send the pending crash reports once.
    Send,
    /// Discard the pending crash reports.
    DontSend,
    /// Send, and persist the consent so future crashes skip the question.
    AlwaysSend,
}

/// Construction-time wiring of a [`Crashes`] instance.
pub struct CrashesConfig {
    pub storage_root: PathBuf,
    pub channel: Arc<dyn LogChannel>,
    pub device_info: Arc<dyn DeviceInfoSource>,
    pub sessions: Arc<dyn SessionHistory>,
    /// Defaults to a store at `<storage_root>/preferences.json`.
    pub preferences: Option<Arc<PreferenceStore>>,
    pub dispatcher: Arc<dyn Dispatcher>,
    /// Whether to capture uncaught panics via the process panic hook.
    pub install_panic_hook: bool,
    /// Listener consulted during startup processing. Must be wired here, not
    /// after [`Crashes::start`]: pending crashes are processed immediately.
    pub listener: Option<Arc<dyn CrashesListener>>,
    /// See [`Crashes::set_automatic_processing`]. Hosts that filter reports
    /// themselves turn this off before starting.
    pub automatic_processing: bool,
}

impl CrashesConfig {
    pub fn new(storage_root: impl Into<PathBuf>, channel: Arc<dyn LogChannel>) -> Self {
        Self {
            storage_root: storage_root.into(),
            channel,
            device_info: Arc::new(HostDeviceInfoSource::default()),
            sessions: Arc::new(InMemorySessionHistory::new()),
            preferences: None,
            dispatcher: Arc::new(InlineDispatcher),
            install_panic_hook: true,
            listener: None,
            automatic_processing: true,
        }
    }
}

struct CoreState {
    enabled: bool,
    automatic_processing: bool,
    listener: Arc<dyn CrashesListener>,
    user_id: Option<String>,
    /// Crashes awaiting confirmation, in stored-file order.
    unprocessed: IndexMap<Uuid, ErrorLogReport>,
    cache: ErrorReportCache,
    last_session_report: Option<ErrorReport>,
    panic_hook: Option<UncaughtExceptionHandler>,
    initialize_timestamp: Option<DateTime<Utc>>,
}

struct Inner {
    store: ErrorStore,
    channel: Arc<dyn LogChannel>,
    device_info: Arc<dyn DeviceInfoSource>,
    sessions: Arc<dyn SessionHistory>,
    preferences: Arc<PreferenceStore>,
    dispatcher: Arc<dyn Dispatcher>,
    worker: SerialWorker,
    state: Mutex<CoreState>,
    /// One crash per process: set on the first saved uncaught exception.
    saved_uncaught_exception: AtomicBool,
    install_panic_hook: bool,
}

/// The crash capture and delivery service.
///
/// Cheap to clone; all clones share one instance.
#[derive(Clone)]
pub struct Crashes {
    inner: Arc<Inner>,
}

impl Crashes {
    /// Starts the service. Initialization (native dump conversion, pending
    /// crash processing) runs on the service worker; the call itself does
    /// not block.
    pub fn start(config: CrashesConfig) -> Self {
        let preferences = config.preferences.unwrap_or_else(|| {
            Arc::new(PreferenceStore::open(
                config.storage_root.join(PREFERENCES_FILE),
            ))
        });
        let service = Self {
            inner: Arc::new(Inner {
                store: ErrorStore::new(config.storage_root),
                channel: config.channel,
                device_info: config.device_info,
                sessions: config.sessions,
                preferences,
                dispatcher: config.dispatcher,
                worker: SerialWorker::new(WORKER_NAME),
                state: Mutex::new(CoreState {
                    enabled: false,
                    automatic_processing: config.automatic_processing,
                    listener: config
                        .listener
                        .unwrap_or_else(|| Arc::new(NoopCrashesListener)),
                    user_id: None,
                    unprocessed: IndexMap::new(),
                    cache: ErrorReportCache::default(),
                    last_session_report: None,
                    panic_hook: None,
                    initialize_timestamp: None,
                }),
                saved_uncaught_exception: AtomicBool::new(false),
                install_panic_hook: config.install_panic_hook,
            }),
        };
        let enabled = service.inner.preferences.get_bool(PREF_KEY_ENABLED, true);
        let startup = service.clone();
        service
            .inner
            .worker
            .post(move || startup.apply_enabled_state(enabled));
        service
    }

    fn state(&self) -> MutexGuard<'_, CoreState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Whether the service is currently enabled.
    pub fn is_enabled(&self) -> ServiceFuture<bool> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner
            .worker
            .post(move || completer.complete(service.state().enabled));
        future
    }

    /// Persists and applies the enabled state. Disabling wipes all stored
    /// crash artifacts and in-memory reports.
    pub fn set_enabled(&self, enabled: bool) -> ServiceFuture<()> {
        self.inner.preferences.put_bool(PREF_KEY_ENABLED, enabled);
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner.worker.post(move || {
            service.apply_enabled_state(enabled);
            completer.complete(());
        });
        future
    }

    fn apply_enabled_state(&self, enabled: bool) {
        let was_enabled = self.state().enabled;
        if enabled == was_enabled {
            return;
        }
        if enabled {
            {
                let mut state = self.state();
                state.enabled = true;
                state.initialize_timestamp = Some(Utc::now());
                if self.inner.install_panic_hook && state.panic_hook.is_none() {
                    let service = self.clone();
                    state.panic_hook = Some(UncaughtExceptionHandler::register(move |throwable| {
                        service.save_uncaught_exception(throwable);
                    }));
                }
            }
            let user_id = self.state().user_id.clone();
            minidump::process_new_minidumps(
                &self.inner.store,
                self.inner.sessions.as_ref(),
                self.inner.device_info.as_ref(),
                user_id.as_deref(),
            );
            {
                let mut state = self.state();
                state.last_session_report =
                    minidump::load_last_session_report(&self.inner.store, &mut state.cache);
            }
            self.process_pending_errors();
            info!("Crashes service has been enabled.");
        } else {
            let hook = {
                let mut state = self.state();
                state.enabled = false;
                state.initialize_timestamp = None;
                state.unprocessed.clear();
                state.cache.clear();
                state.last_session_report = None;
                state.panic_hook.take()
            };
            if let Some(hook) = hook {
                hook.unregister();
            }
            self.inner.store.delete_all_files();
            info!("Crashes service has been disabled.");
        }
    }

    /// Whether the previous session ended in a crash.
    pub fn has_crashed_in_last_session(&self) -> ServiceFuture<bool> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner
            .worker
            .post(move || completer.complete(service.state().last_session_report.is_some()));
        future
    }

    /// The crash report of the previous session, if it ended in a crash.
    pub fn last_session_crash_report(&self) -> ServiceFuture<Option<ErrorReport>> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner
            .worker
            .post(move || completer.complete(service.state().last_session_report.clone()));
        future
    }

    /// Directory the external native producer should write dump files into.
    /// `None` while the service is disabled.
    pub fn new_minidump_directory(&self) -> ServiceFuture<Option<PathBuf>> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner.worker.post(move || {
            let value = service
                .state()
                .enabled
                .then(|| service.inner.store.new_minidump_dir().to_path_buf());
            completer.complete(value);
        });
        future
    }

    /// Reports still awaiting confirmation. Meant for hosts that disabled
    /// automatic processing and filter the reports themselves.
    pub fn unprocessed_error_reports(&self) -> ServiceFuture<Vec<ErrorReport>> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner.worker.post(move || {
            let reports = service
                .state()
                .unprocessed
                .values()
                .map(|entry| entry.report.clone())
                .collect();
            completer.complete(reports);
        });
        future
    }

    /// Replaces the listener. `None` restores the no-op default.
    pub fn set_listener(&self, listener: Option<Arc<dyn CrashesListener>>) {
        self.state().listener = listener.unwrap_or_else(|| Arc::new(NoopCrashesListener));
    }

    /// Turns automatic processing of pending crashes on or off. Off, the
    /// host drives the pipeline through [`Self::unprocessed_error_reports`]
    /// and [`Self::send_crash_reports_or_await_user_confirmation`].
    pub fn set_automatic_processing(&self, automatic: bool) {
        self.state().automatic_processing = automatic;
    }

    /// Sets the user identifier stamped on subsequently captured logs.
    pub fn set_user_id(&self, user_id: Option<String>) {
        self.state().user_id = user_id;
    }

    /// Reports a caught exception as a non-fatal handled error.
    pub fn track_exception(
        &self,
        throwable: Throwable,
        properties: Option<IndexMap<String, String>>,
    ) {
        let properties = validate_properties(properties, HANDLED_ERROR_LOG_TYPE);
        let service = self.clone();
        self.inner.worker.post(move || {
            let (enabled, user_id) = {
                let state = service.state();
                (state.enabled, state.user_id.clone())
            };
            if !enabled {
                debug!("Crashes service is disabled, discarding handled error");
                return;
            }
            let mut throwable = throwable;
            let exception = ExceptionModel::from_throwable(&mut throwable);
            let log = crate::model::HandledErrorLog::new(exception, user_id, properties);
            service.inner.channel.enqueue(
                CrashChannelLog::Handled(log),
                ERROR_GROUP,
                TransmissionFlags::Defaults,
            );
        });
    }

    /// Persists an uncaught exception synchronously. Called from the panic
    /// hook: the process may die right after, so nothing is deferred to the
    /// worker. Only the first crash of a process is saved; returns the crash
    /// id, or `None` when disabled, already saved, or persistence failed.
    pub fn save_uncaught_exception(&self, mut throwable: Throwable) -> Option<Uuid> {
        if !self.state().enabled {
            debug!("Crashes service is disabled, discarding uncaught exception");
            return None;
        }
        if self
            .inner
            .saved_uncaught_exception
            .swap(true, Ordering::SeqCst)
        {
            return None;
        }
        match self.save_crash(&mut throwable) {
            Ok(id) => Some(id),
            Err(e) => {
                error!(error = %e, "Error writing error log to file");
                None
            }
        }
    }

    fn save_crash(&self, throwable: &mut Throwable) -> anyhow::Result<Uuid> {
        let exception = ExceptionModel::from_throwable(throwable);
        let (user_id, app_launch_timestamp) = {
            let state = self.state();
            (state.user_id.clone(), state.initialize_timestamp)
        };
        let timestamp = Utc::now();
        let device = match self.inner.device_info.device_info() {
            Ok(device) => Some(device),
            Err(e) => {
                error!(error = %e, "Could not attach device properties to error log");
                None
            }
        };
        let thread_id = threading::current_thread_id();
        let thread_name = threading::current_thread_name();
        let process_name = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_default();
        let log = CrashLog {
            id: Uuid::new_v4(),
            timestamp,
            app_launch_timestamp: app_launch_timestamp.unwrap_or(timestamp),
            fatal: true,
            user_id,
            process_id: std::process::id(),
            process_name,
            architecture: Some(std::env::consts::ARCH.to_string()),
            error_thread_id: thread_id,
            error_thread_name: Some(thread_name.clone()),
            exception,
            threads: vec![ThreadState {
                id: thread_id,
                name: thread_name,
                frames: throwable.frames.clone(),
            }],
            device,
        };
        self.inner.store.write_error_log(&log)?;
        self.inner.store.write_throwable(log.id, Some(throwable))?;
        debug!(id = %log.id, "Saved uncaught exception");
        Ok(log.id)
    }

    /// Reads every stored crash, builds its report, and routes it through
    /// the confirmation protocol. Corrupt files are deleted on sight.
    fn process_pending_errors(&self) {
        let mut candidates = Vec::new();
        {
            let mut state = self.state();
            for file in self.inner.store.stored_error_log_files() {
                debug!(path = %file.display(), "Process pending error file");
                match self.inner.store.read_error_log(&file) {
                    Ok(log) => match state.cache.build(&log, &self.inner.store) {
                        Some(report) => candidates.push(ErrorLogReport { log, report }),
                        None => {
                            error!(id = %log.id, "Cannot find throwable file for crash, deleting");
                            self.inner.store.remove_stored_error_log_file(log.id);
                            self.inner.store.remove_stored_throwable_file(log.id);
                        }
                    },
                    Err(e) => {
                        error!(error = %e, "Error parsing error log, deleting file");
                        if let Err(e) = fs::remove_file(&file) {
                            warn!(path = %file.display(), error = %e, "Failed to delete file");
                        }
                    }
                }
            }
        }

        let (automatic, listener) = {
            let state = self.state();
            (state.automatic_processing, Arc::clone(&state.listener))
        };
        for entry in candidates {
            if automatic && !listener.should_process(&entry.report) {
                debug!(id = %entry.log.id, "shouldProcess returned false, clean up");
                self.remove_all_stored_files(entry.log.id);
            } else {
                if automatic {
                    debug!(id = %entry.log.id, "shouldProcess returned true, continue processing");
                }
                self.state().unprocessed.insert(entry.log.id, entry);
            }
        }

        if automatic {
            self.send_crashes_or_await_user_confirmation();
        }
    }

    /// Either sends pending crashes right away (persisted consent, or the
    /// listener does not ask for confirmation) or leaves them awaiting
    /// [`Self::notify_user_confirmation`]. The decision runs on the
    /// dispatcher so listener code never runs on the worker; a decision to
    /// send is posted back so the processing itself stays on the worker.
    fn send_crashes_or_await_user_confirmation(&self) {
        let always_send = self.inner.preferences.get_bool(PREF_KEY_ALWAYS_SEND, false);
        let service = self.clone();
        self.inner.dispatcher.dispatch(Box::new(move || {
            let (empty, automatic, listener) = {
                let state = service.state();
                (
                    state.unprocessed.is_empty(),
                    state.automatic_processing,
                    Arc::clone(&state.listener),
                )
            };
            if empty {
                return;
            }
            if always_send {
                debug!("The flag for user confirmation is set to ALWAYS_SEND, will send logs");
                service.notify_user_confirmation(UserConfirmation::Send);
                return;
            }
            if !automatic {
                debug!("Automatic processing disabled, awaiting explicit user confirmation");
                return;
            }
            if listener.should_await_user_confirmation() {
                debug!("shouldAwaitUserConfirmation returned true, awaiting user confirmation");
            } else {
                debug!("shouldAwaitUserConfirmation returned false, will send logs");
                service.notify_user_confirmation(UserConfirmation::Send);
            }
        }));
    }

    /// Keeps only the reports named in `filtered_ids`, deletes the rest,
    /// and re-runs the confirmation protocol for the survivors. Completes
    /// with the persisted "always send" consent.
    pub fn send_crash_reports_or_await_user_confirmation(
        &self,
        filtered_ids: Vec<String>,
    ) -> ServiceFuture<bool> {
        let future = ServiceFuture::new();
        let completer = future.clone();
        let service = self.clone();
        self.inner.worker.post(move || {
            let removed: Vec<Uuid> = {
                let state = service.state();
                state
                    .unprocessed
                    .keys()
                    .filter(|id| !filtered_ids.contains(&id.to_string()))
                    .copied()
                    .collect()
            };
            for id in removed {
                debug!(%id, "Report was filtered out, clean up");
                service.state().unprocessed.shift_remove(&id);
                service.remove_all_stored_files(id);
            }
            let always_send = service.inner.preferences.get_bool(PREF_KEY_ALWAYS_SEND, false);
            completer.complete(always_send);
            service.send_crashes_or_await_user_confirmation();
        });
        future
    }

    /// Applies the user's send decision to the pending crash reports.
    pub fn notify_user_confirmation(&self, confirmation: UserConfirmation) {
        let service = self.clone();
        self.inner
            .worker
            .post(move || service.handle_user_confirmation(confirmation));
    }

    fn handle_user_confirmation(&self, confirmation: UserConfirmation) {
        if !self.state().enabled {
            info!("Crashes service not enabled, discarding calls to handle user confirmation");
            return;
        }
        if confirmation == UserConfirmation::DontSend {
            let ids: Vec<Uuid> = {
                let mut state = self.state();
                mem::take(&mut state.unprocessed).into_keys().collect()
            };
            for id in ids {
                self.remove_all_stored_files(id);
            }
            return;
        }
        if confirmation == UserConfirmation::AlwaysSend {
            self.inner.preferences.put_bool(PREF_KEY_ALWAYS_SEND, true);
        }
        let (entries, automatic, listener) = {
            let mut state = self.state();
            let entries: Vec<ErrorLogReport> =
                mem::take(&mut state.unprocessed).into_values().collect();
            (entries, state.automatic_processing, Arc::clone(&state.listener))
        };
        for entry in entries {
            self.send_crash_report(entry, automatic, listener.as_ref());
        }
    }

    /// Hands one pending crash to the channel: the error log itself, the
    /// minidump attachment for native crashes, and the listener-provided
    /// attachments. The stored log file is deleted; the throwable file
    /// survives until delivery is confirmed.
    fn send_crash_report(
        &self,
        entry: ErrorLogReport,
        automatic: bool,
        listener: &dyn CrashesListener,
    ) {
        let ErrorLogReport { mut log, report } = entry;
        let mut dump_path = None;
        if report.is_native_crash() {
            // The path fields are transient and must never reach the
            // backend; older stored logs carried the path in the legacy
            // stack-trace field.
            dump_path = log
                .exception
                .minidump_file_path
                .take()
                .or_else(|| log.exception.stack_trace.take());
            if dump_path.is_none() {
                warn!(id = %log.id, "No minidump file path for native crash");
            }
        }
        self.inner.channel.enqueue(
            CrashChannelLog::Error(log.clone()),
            ERROR_GROUP,
            TransmissionFlags::Critical,
        );
        if let Some(path) = dump_path {
            match fs::read(&path) {
                Ok(data) => {
                    let attachment =
                        AttachmentLog::with_binary(data, MINIDUMP_FILE_NAME, CONTENT_TYPE_BINARY);
                    self.send_attachment_batch(log.id, Some(vec![attachment]));
                }
                Err(e) => {
                    error!(path = %path, error = %e, "Failed to read minidump file");
                }
            }
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path, error = %e, "Failed to delete file");
            }
        }
        if automatic {
            self.send_attachment_batch(log.id, listener.error_attachments(&report));
        }
        self.inner.store.remove_stored_error_log_file(log.id);
    }

    /// Sends attachments for an already-sent crash report. Meant for hosts
    /// in manual processing mode, which never go through the listener's
    /// attachment callback. A malformed report id is logged and ignored.
    pub fn send_error_attachments(&self, error_report_id: &str, attachments: Vec<AttachmentLog>) {
        let error_id = match Uuid::parse_str(error_report_id) {
            Ok(id) => id,
            Err(e) => {
                error!(id = error_report_id, error = %e, "Error report identifier is malformed");
                return;
            }
        };
        let service = self.clone();
        self.inner.worker.post(move || {
            if !service.state().enabled {
                debug!("Crashes service is disabled, discarding attachments");
                return;
            }
            service.send_attachment_batch(error_id, Some(attachments));
        });
    }

    /// Stamps, validates, and enqueues one batch of attachments for the
    /// crash `error_id`.
    fn send_attachment_batch(&self, error_id: Uuid, attachments: Option<Vec<AttachmentLog>>) {
        let Some(attachments) = attachments else {
            debug!("Listener provided no attachments, nothing additional will be attached");
            return;
        };
        let mut sent = 0usize;
        for mut attachment in attachments {
            attachment.id = Some(Uuid::new_v4());
            attachment.error_id = Some(error_id);
            if attachment.is_valid() {
                sent += 1;
                self.inner.channel.enqueue(
                    CrashChannelLog::Attachment(attachment),
                    ERROR_GROUP,
                    TransmissionFlags::Defaults,
                );
            } else {
                error!("Not all required fields are present in attachment, attachment not sent");
            }
        }
        if sent > MAX_ATTACHMENT_PER_CRASH {
            warn!(
                count = sent,
                max = MAX_ATTACHMENT_PER_CRASH,
                "A limited number of attachments per error report are supported"
            );
        }
    }

    /// Channel callback: a crash-pipeline log is about to be sent, was
    /// delivered, or failed. Only error logs carry listener notifications.
    pub fn on_delivery(&self, log: &CrashChannelLog, outcome: DeliveryOutcome) {
        let CrashChannelLog::Error(error_log) = log else {
            debug!(id = ?log.id(), "Ignoring delivery callback for non-error log");
            return;
        };
        let error_log = error_log.clone();
        let service = self.clone();
        self.inner
            .worker
            .post(move || service.process_delivery(error_log, outcome));
    }

    fn process_delivery(&self, log: CrashLog, outcome: DeliveryOutcome) {
        let report = {
            let mut state = self.state();
            state.cache.build(&log, &self.inner.store)
        };
        let Some(report) = report else {
            warn!(id = %log.id, "Cannot find crash report for the error log");
            return;
        };
        let listener = Arc::clone(&self.state().listener);
        match outcome {
            DeliveryOutcome::BeforeSending => {
                self.inner
                    .dispatcher
                    .dispatch(Box::new(move || listener.on_before_sending(&report)));
            }
            DeliveryOutcome::Succeeded => {
                self.remove_throwable_artifact(log.id);
                self.inner
                    .dispatcher
                    .dispatch(Box::new(move || listener.on_sending_succeeded(&report)));
            }
            DeliveryOutcome::Failed(e) => {
                self.remove_throwable_artifact(log.id);
                self.inner
                    .dispatcher
                    .dispatch(Box::new(move || listener.on_sending_failed(&report, &e)));
            }
        }
    }

    fn remove_throwable_artifact(&self, id: Uuid) {
        self.state().cache.remove(id);
        self.inner.store.remove_stored_throwable_file(id);
    }

    fn remove_all_stored_files(&self, id: Uuid) {
        self.state().cache.remove(id);
        self.inner.store.remove_stored_error_log_file(id);
        self.inner.store.remove_stored_throwable_file(id);
    }
}
