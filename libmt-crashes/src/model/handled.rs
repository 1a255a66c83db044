// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::model::ExceptionModel;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A caught, intentionally reported exception. Non-fatal, never subject to
/// the user-confirmation protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandledErrorLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub exception: ExceptionModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, String>>,
}

impl HandledErrorLog {
    pub fn new(
        exception: ExceptionModel,
        user_id: Option<String>,
        properties: Option<IndexMap<String, String>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id,
            exception,
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_with_insertion_ordered_properties() {
        let mut properties = IndexMap::new();
        properties.insert("zeta".to_string(), "1".to_string());
        properties.insert("alpha".to_string(), "2".to_string());
        let log = HandledErrorLog::new(
            ExceptionModel::new("Error"),
            Some("user-1".into()),
            Some(properties),
        );

        let json = serde_json::to_string(&log).unwrap();
        // Properties serialize in insertion order, not re-sorted.
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
        let back: HandledErrorLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_absent_options_are_omitted() {
        let log = HandledErrorLog::new(ExceptionModel::new("Error"), None, None);
        let json = serde_json::to_string(&log).unwrap();
        assert!(!json.contains("user_id"));
        assert!(!json.contains("properties"));
    }
}
