// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Crash capture and delivery pipeline.
//!
//! [`Crashes`] persists uncaught exceptions and native minidumps at crash
//! time, replays the stored reports on the next launch through an optional
//! user-confirmation step, and hands the survivors to the host's
//! transmission channel. See [`CrashesConfig`] for wiring.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod channel;
pub mod listener;
mod minidump;
pub mod model;
pub mod properties;
mod report_cache;
pub mod service;
pub mod storage;
pub mod throwable;
mod uncaught;

pub use channel::{
    CrashChannelLog, DeliveryOutcome, LogChannel, TransmissionFlags, ERROR_GROUP,
};
pub use listener::{CrashesListener, NoopCrashesListener};
pub use minidump::WRAPPER_SDK_NAME_NDK;
pub use model::{
    AttachmentLog, CrashLog, ErrorReport, ExceptionModel, HandledErrorLog, StackFrame, ThreadState,
};
pub use service::{
    Crashes, CrashesConfig, UserConfirmation, MAX_ATTACHMENT_PER_CRASH, PREF_KEY_ALWAYS_SEND,
    PREF_KEY_ENABLED,
};
pub use throwable::Throwable;
pub use uncaught::PANIC_EXCEPTION_TYPE;
