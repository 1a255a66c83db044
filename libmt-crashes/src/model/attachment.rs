// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content type used for minidump attachments.
pub const CONTENT_TYPE_BINARY: &str = "application/octet-stream";

/// Content type used for plain-text attachments.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// File name given to the minidump attachment of a native crash.
pub const MINIDUMP_FILE_NAME: &str = "minidump.dmp";

/// One attachment to a crash report, enqueued as its own log.
///
/// `id` and `error_id` are stamped by the service when the attachment is
/// sent; an attachment missing either, or with an empty content type, fails
/// validation and is skipped rather than sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_id: Option<Uuid>,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl AttachmentLog {
    /// Attachment with binary content.
    pub fn with_binary(
        data: Vec<u8>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            error_id: None,
            content_type: content_type.into(),
            file_name: Some(file_name.into()),
            data,
        }
    }

    /// Attachment with UTF-8 text content.
    pub fn with_text(text: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self::with_binary(text.into().into_bytes(), file_name, CONTENT_TYPE_TEXT)
    }

    /// Checks the fields required by the ingestion schema.
    pub fn is_valid(&self) -> bool {
        self.id.is_some() && self.error_id.is_some() && !self.content_type.is_empty()
    }
}
