// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Serial background worker and completion handles.
//!
//! Every service instance owns one [`SerialWorker`]: a single named thread
//! draining a FIFO queue of jobs. Jobs execute in submission order, which is
//! the only ordering guarantee service state relies on. Public service calls
//! return a [`ServiceFuture`] that completes on the worker and is observed
//! through callback registration rather than by blocking the caller.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Shutdown,
}

/// A single background thread executing jobs in submission order.
pub struct SerialWorker {
    tx: Mutex<Sender<Message>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SerialWorker {
    pub fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::channel::<Message>();
        let thread_name = name.to_string();
        let builder = std::thread::Builder::new().name(thread_name.clone());
        let handle = builder
            .spawn(move || {
                debug!(worker = %thread_name, "Worker thread started");
                while let Ok(message) = rx.recv() {
                    match message {
                        Message::Run(job) => job(),
                        Message::Shutdown => break,
                    }
                }
                debug!(worker = %thread_name, "Worker thread stopped");
            })
            .ok();
        if handle.is_none() {
            error!(worker = name, "Failed to spawn worker thread, jobs will run inline");
        }
        Self {
            tx: Mutex::new(tx),
            handle: Mutex::new(handle),
        }
    }

    /// Submits a job. Jobs run in submission order on the worker thread. If
    /// the thread could not be spawned or has shut down, the job runs inline
    /// so that callers still observe completion.
    pub fn post<F: FnOnce() + Send + 'static>(&self, job: F) {
        let mut job: Option<Job> = Some(Box::new(job));
        if let Ok(tx) = self.tx.lock() {
            if let Some(queued) = job.take() {
                if let Err(returned) = tx.send(Message::Run(queued)) {
                    if let Message::Run(returned) = returned.0 {
                        job = Some(returned);
                    }
                }
            }
        }
        if let Some(job) = job {
            job();
        }
    }

    /// Drains the queue and joins the worker thread.
    pub fn shutdown(&self) {
        if let Ok(tx) = self.tx.lock() {
            let _ = tx.send(Message::Shutdown);
        }
        if let Ok(mut handle) = self.handle.lock() {
            if let Some(handle) = handle.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for SerialWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct FutureState<T> {
    value: Option<T>,
    callbacks: Vec<Box<dyn FnOnce(T) + Send + 'static>>,
}

/// A completion handle for an asynchronous service call.
///
/// Completes exactly once; later completions are ignored. Callbacks
/// registered before completion run on the completing thread, callbacks
/// registered after completion run inline on the registering thread.
pub struct ServiceFuture<T: Clone + Send + 'static> {
    state: Arc<(Mutex<FutureState<T>>, Condvar)>,
}

impl<T: Clone + Send + 'static> Clone for ServiceFuture<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + 'static> Default for ServiceFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> ServiceFuture<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new((
                Mutex::new(FutureState {
                    value: None,
                    callbacks: Vec::new(),
                }),
                Condvar::new(),
            )),
        }
    }

    /// Creates an already-completed future.
    pub fn completed(value: T) -> Self {
        let future = Self::new();
        future.complete(value);
        future
    }

    /// Completes the future. Only the first completion takes effect.
    pub fn complete(&self, value: T) {
        let callbacks = {
            let (lock, condvar) = &*self.state;
            let Ok(mut state) = lock.lock() else { return };
            if state.value.is_some() {
                return;
            }
            state.value = Some(value.clone());
            condvar.notify_all();
            std::mem::take(&mut state.callbacks)
        };
        for callback in callbacks {
            callback(value.clone());
        }
    }

    /// Registers a completion callback.
    pub fn on_complete<F: FnOnce(T) + Send + 'static>(&self, callback: F) {
        let mut callback = Some(callback);
        let ready = {
            let (lock, _) = &*self.state;
            let Ok(mut state) = lock.lock() else { return };
            match &state.value {
                Some(value) => Some(value.clone()),
                None => {
                    if let Some(callback) = callback.take() {
                        state.callbacks.push(Box::new(callback));
                    }
                    None
                }
            }
        };
        if let (Some(value), Some(callback)) = (ready, callback.take()) {
            callback(value);
        }
    }

    /// Blocks until the future completes and returns the value. Intended for
    /// tests and the rare internal path that must observe completion
    /// synchronously; listener-facing code registers callbacks instead.
    pub fn get(&self) -> T {
        let (lock, condvar) = &*self.state;
        let mut state = match lock.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            if let Some(value) = &state.value {
                return value.clone();
            }
            state = match condvar.wait(state) {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Returns the value if the future already completed.
    pub fn try_get(&self) -> Option<T> {
        let (lock, _) = &*self.state;
        lock.lock().ok().and_then(|state| state.value.clone())
    }
}
