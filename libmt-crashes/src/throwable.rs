// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The raw exception object handed to the SDK by the host runtime.
//!
//! A [`Throwable`] is stored next to the structured JSON crash log for
//! client-side inspection, in a binary artifact. That serialization is
//! treated as untrusted work: the cause chain is depth-bounded and any
//! failure degrades to the empty placeholder file, never blocking the JSON
//! log that was written first.

use crate::model::StackFrame;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Exception type assigned to throwables that stand in for a native crash.
pub const NATIVE_CRASH_TYPE: &str = "NativeCrash";

/// Hard bound on the cause-chain depth accepted by the binary serializer.
/// A pathologically deep chain fails serialization instead of walking it.
pub const MAX_SERIALIZED_CAUSE_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throwable {
    pub type_name: String,
    pub message: Option<String>,
    pub frames: Vec<StackFrame>,
    pub cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(type_name: impl Into<String>, message: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message,
            frames: Vec::new(),
            cause: None,
        }
    }

    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Stand-in throwable for a crash that happened outside the managed
    /// runtime. Native crashes have no exception object; this marker drives
    /// the minidump attachment path at send time.
    pub fn native_crash() -> Self {
        Self::new(
            NATIVE_CRASH_TYPE,
            Some("Native exception read from a minidump file".to_string()),
        )
    }

    pub fn is_native_crash(&self) -> bool {
        self.type_name == NATIVE_CRASH_TYPE
    }

    /// Length of the cause chain including this throwable.
    pub fn cause_chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self.cause.as_deref();
        while let Some(node) = current {
            len += 1;
            current = node.cause.as_deref();
        }
        len
    }

    /// Binary serialization for the `.throwable` artifact. Fails on an
    /// over-deep cause chain or an encoder error; the caller substitutes the
    /// empty placeholder file in that case.
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let depth = self.cause_chain_len();
        anyhow::ensure!(
            depth <= MAX_SERIALIZED_CAUSE_DEPTH,
            "Throwable cause chain too deep to serialize: {depth} > {MAX_SERIALIZED_CAUSE_DEPTH}"
        );
        bincode::serialize(self).context("Failed to serialize throwable")
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        bincode::deserialize(bytes).context("Failed to deserialize throwable")
    }
}
