// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod attachment;
mod error_log;
mod exception;
mod handled;
mod report;

pub use attachment::*;
pub use error_log::*;
pub use exception::*;
pub use handled::*;
pub use report::*;
