// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Uncaught-exception capture via the process panic hook.
//!
//! Registration chains the previously installed hook: the crash is persisted
//! first, then the previous hook (typically the default backtrace printer)
//! runs unchanged. Unregistration restores the previous hook.

use crate::model::StackFrame;
use crate::throwable::Throwable;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use tracing::debug;

/// Exception type reported for an uncaught panic.
pub const PANIC_EXCEPTION_TYPE: &str = "Panic";

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync;

pub(crate) struct UncaughtExceptionHandler {
    previous: Arc<PanicHook>,
}

impl UncaughtExceptionHandler {
    /// Installs the capture hook. `on_crash` receives the throwable built
    /// from the panic and must do its own persistence synchronously: the
    /// process may die right after the hook returns.
    pub fn register<F>(on_crash: F) -> Self
    where
        F: Fn(Throwable) + Send + Sync + 'static,
    {
        debug!("Register panic hook");
        let previous: Arc<PanicHook> = Arc::from(std::panic::take_hook());
        let chained = Arc::clone(&previous);
        std::panic::set_hook(Box::new(move |info| {
            on_crash(throwable_from_panic(info));
            chained(info);
        }));
        Self { previous }
    }

    /// Restores the hook that was installed before [`Self::register`].
    pub fn unregister(&self) {
        debug!("Unregister panic hook");
        let previous = Arc::clone(&self.previous);
        std::panic::set_hook(Box::new(move |info| previous(info)));
    }
}

/// Builds the raw throwable for a panic: the payload string becomes the
/// message, the panic location becomes the single known frame.
fn throwable_from_panic(info: &PanicHookInfo<'_>) -> Throwable {
    let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
        Some((*message).to_string())
    } else {
        info.payload().downcast_ref::<String>().cloned()
    };
    let frames = info
        .location()
        .map(|location| {
            vec![StackFrame {
                class_name: location.file().to_string(),
                method_name: "panic".to_string(),
                file_name: Some(location.file().to_string()),
                line_number: Some(location.line()),
            }]
        })
        .unwrap_or_default();
    Throwable::new(PANIC_EXCEPTION_TYPE, message).with_frames(frames)
}
