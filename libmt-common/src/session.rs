// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Mutex;

/// One recorded application session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    /// When the session was recorded, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// When the application process launched, milliseconds since the epoch.
    pub app_launch_timestamp: i64,
}

/// Lookup into session history, used by the native crash bridge to recover
/// the launch time of the session a minidump was produced in.
pub trait SessionHistory: Send + Sync {
    /// Returns the session that was active at `timestamp`, i.e. the most
    /// recent session recorded at or before that instant.
    fn session_at(&self, timestamp: i64) -> Option<SessionInfo>;
}

/// Session history kept in memory, ordered by record timestamp.
#[derive(Debug, Default)]
pub struct InMemorySessionHistory {
    sessions: Mutex<Vec<SessionInfo>>,
}

impl InMemorySessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, session: SessionInfo) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push(session);
            sessions.sort_by_key(|s| s.timestamp);
        }
    }
}

impl SessionHistory for InMemorySessionHistory {
    fn session_at(&self, timestamp: i64) -> Option<SessionInfo> {
        let sessions = self.sessions.lock().ok()?;
        sessions
            .iter()
            .rev()
            .find(|s| s.timestamp <= timestamp)
            .copied()
    }
}
