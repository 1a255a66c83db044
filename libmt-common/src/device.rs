// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Immutable snapshot of the device and runtime the SDK runs on, attached to
/// every crash log at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub os_type: String,
    pub os_version: String,
    pub architecture: String,
    pub bitness: String,
    pub model: Option<String>,
    pub app_version: Option<String>,
    /// Name of the wrapper SDK that produced the log, if any. Set by the
    /// native crash bridge for minidump-backed reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper_sdk_name: Option<String>,
}

impl DeviceInfo {
    pub fn with_wrapper_sdk_name(mut self, wrapper_sdk_name: impl Into<String>) -> Self {
        self.wrapper_sdk_name = Some(wrapper_sdk_name.into());
        self
    }
}

impl From<os_info::Info> for DeviceInfo {
    fn from(value: os_info::Info) -> Self {
        let architecture = value.architecture().unwrap_or("unknown").to_string();
        let bitness = value.bitness().to_string();
        let os_type = value.os_type().to_string();
        let os_version = value.version().to_string();
        Self {
            os_type,
            os_version,
            architecture,
            bitness,
            model: None,
            app_version: None,
            wrapper_sdk_name: None,
        }
    }
}

/// Accessor for the current device snapshot. Snapshotting can fail on
/// exotic hosts, and crash capture must keep working without it.
pub trait DeviceInfoSource: Send + Sync {
    fn device_info(&self) -> anyhow::Result<DeviceInfo>;
}

/// Default source reading the host OS through `os_info`.
#[derive(Debug, Default, Clone)]
pub struct HostDeviceInfoSource {
    pub app_version: Option<String>,
}

impl HostDeviceInfoSource {
    pub fn new(app_version: Option<String>) -> Self {
        Self { app_version }
    }
}

impl DeviceInfoSource for HostDeviceInfoSource {
    fn device_info(&self) -> anyhow::Result<DeviceInfo> {
        let mut info = DeviceInfo::from(os_info::get());
        info.app_version = self.app_version.clone();
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_source_snapshots_os() {
        let info = HostDeviceInfoSource::new(Some("1.2.3".into()))
            .device_info()
            .unwrap();
        assert!(!info.os_type.is_empty());
        assert_eq!(info.app_version.as_deref(), Some("1.2.3"));
        assert_eq!(info.wrapper_sdk_name, None);
    }

    #[test]
    fn test_wrapper_sdk_name_override() {
        let info = DeviceInfo::from(os_info::get()).with_wrapper_sdk_name("ndk");
        assert_eq!(info.wrapper_sdk_name.as_deref(), Some("ndk"));
    }
}
