// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Interface to the external transmission channel.
//!
//! Batching, persistence, retry and the wire format live in the channel;
//! this module defines only the surface the crash pipeline needs: a typed
//! envelope for the logs it produces, an `enqueue` seam, and the delivery
//! outcomes the channel reports back per log.

use crate::model::{AttachmentLog, CrashLog, HandledErrorLog};
use uuid::Uuid;

/// Group name under which all crash-pipeline logs are enqueued.
pub const ERROR_GROUP: &str = "group_errors";

/// Transmission priority for an enqueued log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionFlags {
    Defaults,
    /// Elevated priority used for fatal crash logs.
    Critical,
}

/// A log produced by the crash pipeline, as the channel sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum CrashChannelLog {
    Error(CrashLog),
    Handled(HandledErrorLog),
    Attachment(AttachmentLog),
}

impl CrashChannelLog {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            CrashChannelLog::Error(log) => Some(log.id),
            CrashChannelLog::Handled(log) => Some(log.id),
            CrashChannelLog::Attachment(log) => log.id,
        }
    }
}

/// The transmission channel this pipeline enqueues logs into.
pub trait LogChannel: Send + Sync {
    fn enqueue(&self, log: CrashChannelLog, group: &str, flags: TransmissionFlags);
}

/// Per-log delivery outcome reported by the channel.
#[derive(Debug)]
pub enum DeliveryOutcome {
    BeforeSending,
    Succeeded,
    Failed(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExceptionModel;

    #[test]
    fn test_log_id_matches_wrapped_log() {
        let handled = HandledErrorLog::new(ExceptionModel::new("Error"), None, None);
        let id = handled.id;
        assert_eq!(CrashChannelLog::Handled(handled).id(), Some(id));

        // Attachments carry no id until the service stamps them.
        let attachment = AttachmentLog::with_text("context", "notes.txt");
        assert_eq!(CrashChannelLog::Attachment(attachment).id(), None);
    }
}
