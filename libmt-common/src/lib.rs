// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod device;
pub mod dispatch;
pub mod prefs;
pub mod session;
pub mod threading;
pub mod worker;

pub use device::{DeviceInfo, DeviceInfoSource, HostDeviceInfoSource};
pub use dispatch::{Dispatcher, InlineDispatcher};
pub use prefs::PreferenceStore;
pub use session::{InMemorySessionHistory, SessionHistory, SessionInfo};
pub use worker::{SerialWorker, ServiceFuture};
