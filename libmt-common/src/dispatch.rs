// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Redispatches listener-facing callbacks onto the application's UI thread.
///
/// The crash service serializes its own work on a background worker; user
/// code must never run under that serialization discipline. Host
/// applications provide a dispatcher bound to their main-thread looper. The
/// default [`InlineDispatcher`] runs callbacks on the calling thread and is
/// suitable for tests and headless hosts.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, callback: Box<dyn FnOnce() + Send + 'static>);
}

/// Runs callbacks inline on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, callback: Box<dyn FnOnce() + Send + 'static>) {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_inline_dispatcher_runs_callback() {
        let hit = Arc::new(AtomicBool::new(false));
        let hit2 = Arc::clone(&hit);
        InlineDispatcher.dispatch(Box::new(move || hit2.store(true, Ordering::SeqCst)));
        assert!(hit.load(Ordering::SeqCst));
    }
}
