// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::throwable::Throwable;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// For huge stack traces such as runaway recursion, only the beginning and
/// the end of the frame list are kept, up to this many frames per exception.
pub const FRAME_LIMIT: usize = 256;

const FRAME_LIMIT_HALF: usize = FRAME_LIMIT / 2;

/// For huge exception cause chains, only the beginning and the end of the
/// chain are kept, up to this many causes.
pub const CAUSE_LIMIT: usize = 16;

const CAUSE_LIMIT_HALF: usize = CAUSE_LIMIT / 2;

/// Exception type used for crash logs synthesized from native minidumps.
pub const MINIDUMP_EXCEPTION_TYPE: &str = "minidump";

/// One stack entry of an exception or a thread snapshot. Value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub class_name: String,
    pub method_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
}

/// Language-neutral exception model: one exception plus its cause chain,
/// flattened into a singly-linked chain of at most [`CAUSE_LIMIT`] nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionModel {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,
    /// Name of the wrapper SDK that produced this exception, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_sdk_name: Option<String>,
    /// Path to the minidump file backing a native crash. Transient: cleared
    /// before the log is handed to the channel, must never reach the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minidump_file_path: Option<String>,
    /// Legacy field: older SDK versions stored the minidump path here.
    /// Read as a fallback when migrating previously stored crashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_exception: Option<Box<ExceptionModel>>,
}

impl ExceptionModel {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
            frames: Vec::new(),
            wrapper_sdk_name: None,
            minidump_file_path: None,
            stack_trace: None,
            inner_exception: None,
        }
    }

    /// Synthetic model for a native crash: carries only a reference to the
    /// dump file, not its bytes, and a marker identifying the producer.
    pub fn minidump(minidump_file_path: impl Into<String>, wrapper_sdk_name: impl Into<String>) -> Self {
        let mut model = Self::new(MINIDUMP_EXCEPTION_TYPE);
        model.minidump_file_path = Some(minidump_file_path.into());
        model.wrapper_sdk_name = Some(wrapper_sdk_name.into());
        model
    }

    /// Builds the model chain from a throwable, walking from the original
    /// failure to its root cause in that order. Chains longer than
    /// [`CAUSE_LIMIT`] keep the first and last half of the limit; the middle
    /// is dropped without a placeholder. Frame lists are truncated per
    /// exception by the [`FRAME_LIMIT`] policy, and the truncated list is
    /// written back onto the throwable so later stages observe the same
    /// frames. Always succeeds.
    pub fn from_throwable(throwable: &mut Throwable) -> Self {
        let chain_len = throwable.cause_chain_len();
        if chain_len > CAUSE_LIMIT {
            warn!(
                from = chain_len,
                to = CAUSE_LIMIT,
                "Crash causes truncated"
            );
        }
        let top_type = throwable.type_name.clone();

        let mut kept = Vec::new();
        let mut index = 0usize;
        let mut current = Some(throwable);
        while let Some(node) = current {
            if keep_cause(index, chain_len) {
                truncate_frames(node);
                let mut model = ExceptionModel::new(node.type_name.clone());
                model.message = node.message.clone();
                model.frames = node.frames.clone();
                kept.push(model);
            }
            index += 1;
            current = node.cause.as_deref_mut();
        }

        // Link the kept nodes back into a chain, most-root cause innermost.
        let mut inner: Option<Box<ExceptionModel>> = None;
        for mut model in kept.into_iter().rev() {
            model.inner_exception = inner.take();
            inner = Some(Box::new(model));
        }
        match inner {
            Some(model) => *model,
            // A throwable always has at least a type name.
            None => ExceptionModel::new(top_type),
        }
    }

    /// Number of nodes in this model's inner-exception chain, including self.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut current = self.inner_exception.as_deref();
        while let Some(node) = current {
            len += 1;
            current = node.inner_exception.as_deref();
        }
        len
    }
}

fn keep_cause(index: usize, chain_len: usize) -> bool {
    chain_len <= CAUSE_LIMIT || index < CAUSE_LIMIT_HALF || index >= chain_len - CAUSE_LIMIT_HALF
}

/// Applies the frame-limit policy in place: first and last half of the limit
/// survive, nothing marks the gap.
fn truncate_frames(throwable: &mut Throwable) {
    let count = throwable.frames.len();
    if count > FRAME_LIMIT {
        warn!(from = count, to = FRAME_LIMIT, "Crash frames truncated");
        throwable.frames.drain(FRAME_LIMIT_HALF..count - FRAME_LIMIT_HALF);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(i: usize) -> StackFrame {
        StackFrame {
            class_name: format!("com.example.Class{i}"),
            method_name: format!("method{i}"),
            file_name: Some(format!("Class{i}.java")),
            line_number: Some(i as u32),
        }
    }

    fn chain(len: usize) -> Throwable {
        let mut throwable: Option<Throwable> = None;
        for i in (0..len).rev() {
            let mut node = Throwable::new(format!("Error{i}"), Some(format!("message {i}")));
            node.cause = throwable.take().map(Box::new);
            throwable = Some(node);
        }
        throwable.unwrap()
    }

    #[test]
    fn test_short_chain_preserved_in_order() {
        let mut throwable = chain(CAUSE_LIMIT);
        let model = ExceptionModel::from_throwable(&mut throwable);
        assert_eq!(model.chain_len(), CAUSE_LIMIT);
        let mut current = Some(&model);
        let mut i = 0;
        while let Some(node) = current {
            assert_eq!(node.type_name, format!("Error{i}"));
            assert_eq!(node.message.as_deref(), Some(format!("message {i}").as_str()));
            current = node.inner_exception.as_deref();
            i += 1;
        }
        assert_eq!(i, CAUSE_LIMIT);
    }

    #[test]
    fn test_long_chain_keeps_head_and_tail() {
        let mut throwable = chain(20);
        let model = ExceptionModel::from_throwable(&mut throwable);
        assert_eq!(model.chain_len(), CAUSE_LIMIT);

        let mut names = Vec::new();
        let mut current = Some(&model);
        while let Some(node) = current {
            names.push(node.type_name.clone());
            current = node.inner_exception.as_deref();
        }
        let expected: Vec<String> = (0..8)
            .chain(12..20)
            .map(|i| format!("Error{i}"))
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_single_exception() {
        let mut throwable = Throwable::new("OutOfMemory", None);
        let model = ExceptionModel::from_throwable(&mut throwable);
        assert_eq!(model.type_name, "OutOfMemory");
        assert_eq!(model.chain_len(), 1);
        assert!(model.frames.is_empty());
    }

    #[test]
    fn test_short_frame_list_preserved() {
        let mut throwable = Throwable::new("Error", None);
        throwable.frames = (0..FRAME_LIMIT).map(frame).collect();
        let model = ExceptionModel::from_throwable(&mut throwable);
        assert_eq!(model.frames.len(), FRAME_LIMIT);
        assert_eq!(model.frames[0], frame(0));
        assert_eq!(model.frames[FRAME_LIMIT - 1], frame(FRAME_LIMIT - 1));
    }

    #[test]
    fn test_long_frame_list_keeps_head_and_tail_contiguous() {
        let mut throwable = Throwable::new("StackOverflow", None);
        throwable.frames = (0..300).map(frame).collect();
        let model = ExceptionModel::from_throwable(&mut throwable);
        assert_eq!(model.frames.len(), FRAME_LIMIT);
        let expected: Vec<StackFrame> = (0..128).chain(172..300).map(frame).collect();
        assert_eq!(model.frames, expected);
        // The source throwable observes the same truncated list.
        assert_eq!(throwable.frames, expected);
    }

    #[test]
    fn test_minidump_model_carries_path_not_bytes() {
        let model = ExceptionModel::minidump("/errors/minidump/pending/a.dmp", "ndk");
        assert_eq!(model.type_name, MINIDUMP_EXCEPTION_TYPE);
        assert_eq!(
            model.minidump_file_path.as_deref(),
            Some("/errors/minidump/pending/a.dmp")
        );
        assert_eq!(model.wrapper_sdk_name.as_deref(), Some("ndk"));
        assert!(model.frames.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut throwable = chain(3);
        throwable.frames = (0..4).map(frame).collect();
        let model = ExceptionModel::from_throwable(&mut throwable);
        let json = serde_json::to_string(&model).unwrap();
        let back: ExceptionModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
