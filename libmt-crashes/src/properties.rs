// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use tracing::warn;

/// Max number of properties attached to one log.
pub const MAX_PROPERTY_COUNT: usize = 20;

/// Max length of a property key or value, in characters.
pub const MAX_PROPERTY_ITEM_LENGTH: usize = 125;

/// Validates caller-supplied properties for a log of type `log_type`.
///
/// `None` in, `None` out. Entries are visited in their original order:
/// entries beyond [`MAX_PROPERTY_COUNT`], entries with an empty key are
/// skipped with a warning; over-long keys and values are truncated to
/// [`MAX_PROPERTY_ITEM_LENGTH`] characters rather than skipped. Never fails.
pub fn validate_properties(
    properties: Option<IndexMap<String, String>>,
    log_type: &str,
) -> Option<IndexMap<String, String>> {
    let properties = properties?;
    let mut result = IndexMap::new();
    for (key, value) in properties {
        if result.len() >= MAX_PROPERTY_COUNT {
            warn!(
                log_type,
                max = MAX_PROPERTY_COUNT,
                "Properties cannot contain more items, skipping other properties"
            );
            break;
        }
        if key.is_empty() {
            warn!(log_type, "A property key cannot be empty, property skipped");
            continue;
        }
        let key = truncate(key, log_type, "key");
        let value = truncate(value, log_type, "value");
        result.insert(key, value);
    }
    Some(result)
}

fn truncate(item: String, log_type: &str, what: &str) -> String {
    if item.chars().count() > MAX_PROPERTY_ITEM_LENGTH {
        warn!(
            log_type,
            max = MAX_PROPERTY_ITEM_LENGTH,
            "Property {what} too long, truncated"
        );
        item.chars().take(MAX_PROPERTY_ITEM_LENGTH).collect()
    } else {
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_in_none_out() {
        assert_eq!(validate_properties(None, "HandledError"), None);
    }

    #[test]
    fn test_caps_at_max_count_in_order() {
        let mut properties = IndexMap::new();
        for i in 0..30 {
            properties.insert(format!("key{i:02}"), format!("value{i}"));
        }
        let result = validate_properties(Some(properties), "HandledError").unwrap();
        assert_eq!(result.len(), MAX_PROPERTY_COUNT);
        let keys: Vec<&String> = result.keys().collect();
        assert_eq!(keys[0], "key00");
        assert_eq!(keys[19], "key19");
    }

    #[test]
    fn test_empty_key_skipped() {
        let mut properties = IndexMap::new();
        properties.insert(String::new(), "value".to_string());
        properties.insert("valid".to_string(), "value".to_string());
        let result = validate_properties(Some(properties), "HandledError").unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_key("valid"));
    }

    #[test]
    fn test_long_key_and_value_truncated_to_exact_length() {
        let mut properties = IndexMap::new();
        properties.insert("k".repeat(200), "v".repeat(200));
        let result = validate_properties(Some(properties), "HandledError").unwrap();
        let (key, value) = result.iter().next().unwrap();
        assert_eq!(key.chars().count(), MAX_PROPERTY_ITEM_LENGTH);
        assert_eq!(value.chars().count(), MAX_PROPERTY_ITEM_LENGTH);
    }

    #[test]
    fn test_exact_length_untouched() {
        let mut properties = IndexMap::new();
        properties.insert("k".repeat(MAX_PROPERTY_ITEM_LENGTH), "v".to_string());
        let result = validate_properties(Some(properties), "HandledError").unwrap();
        assert!(result.contains_key(&"k".repeat(MAX_PROPERTY_ITEM_LENGTH)));
    }
}
