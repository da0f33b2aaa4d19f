use std::collections::BTreeMap;

use serde_json::Value;

/// Session tags. Values are always strings, whatever the source encoded.
pub type Tags = BTreeMap<String, String>;

/// Normalize a JSON tag payload into a flat string map.
///
/// Two shapes are accepted: an object of scalar values, or a list of
/// `{"name": ..., "value": ...}` entries. Anything else yields an empty map,
/// as does a list with any entry missing one of the two keys.
pub fn tags_from_value(value: &Value) -> Tags {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| (name.clone(), scalar_to_string(value)))
            .collect(),
        Value::Array(entries) => {
            let mut tags = Tags::new();
            for entry in entries {
                let (Some(name), Some(value)) = (entry.get("name"), entry.get("value")) else {
                    return Tags::new();
                };
                tags.insert(scalar_to_string(name), scalar_to_string(value));
            }
            tags
        }
        _ => Tags::new(),
    }
}

/// Parse a raw JSON tag blob. Malformed JSON yields an empty map.
pub fn tags_from_json(raw: &str) -> Tags {
    serde_json::from_str::<Value>(raw)
        .map(|value| tags_from_value(&value))
        .unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_values_are_coerced_to_strings() {
        let tags = tags_from_value(&json!({"build": 42, "nightly": true, "branch": "main"}));
        assert_eq!(tags.get("build").map(String::as_str), Some("42"));
        assert_eq!(tags.get("nightly").map(String::as_str), Some("true"));
        assert_eq!(tags.get("branch").map(String::as_str), Some("main"));
    }

    #[test]
    fn name_value_list_maps_to_pairs() {
        let tags = tags_from_value(&json!([
            {"name": "pipeline_branch", "value": "release"},
            {"name": "pipeline_build_no", "value": "77"},
        ]));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("pipeline_branch").map(String::as_str), Some("release"));
    }

    #[test]
    fn one_malformed_list_entry_discards_everything() {
        let tags = tags_from_value(&json!([
            {"name": "ok", "value": "1"},
            {"name": "missing_value"},
        ]));
        assert!(tags.is_empty());
    }

    #[test]
    fn scalars_and_bad_json_yield_empty_maps() {
        assert!(tags_from_value(&json!("just a string")).is_empty());
        assert!(tags_from_value(&Value::Null).is_empty());
        assert!(tags_from_json("{not json").is_empty());
    }
}
