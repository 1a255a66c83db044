// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::{AttachmentLog, ErrorReport};

/// Application-facing callbacks of the crash service.
///
/// Every method has a no-op default, so implementors override only the
/// capabilities they need. Filtering and confirmation callbacks run on the
/// service worker; notification callbacks (`on_*`) are redispatched onto
/// the configured UI dispatcher before user code runs.
pub trait CrashesListener: Send + Sync {
    /// Whether `report` should be processed at all. Returning false deletes
    /// the stored crash without sending it.
    fn should_process(&self, report: &ErrorReport) -> bool {
        let _ = report;
        true
    }

    /// Whether to wait for an explicit user confirmation before sending.
    /// Ignored when the persisted "always send" consent is set.
    fn should_await_user_confirmation(&self) -> bool {
        false
    }

    /// Additional attachments to send with `report`. At most
    /// [`crate::MAX_ATTACHMENT_PER_CRASH`] attachments are expected per
    /// crash; more are still sent but trigger a warning.
    fn error_attachments(&self, report: &ErrorReport) -> Option<Vec<AttachmentLog>> {
        let _ = report;
        None
    }

    fn on_before_sending(&self, report: &ErrorReport) {
        let _ = report;
    }

    fn on_sending_succeeded(&self, report: &ErrorReport) {
        let _ = report;
    }

    fn on_sending_failed(&self, report: &ErrorReport, error: &anyhow::Error) {
        let _ = (report, error);
    }
}

/// The default listener: processes everything, confirms nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCrashesListener;

impl CrashesListener for NoopCrashesListener {}
