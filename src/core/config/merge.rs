//! Dotted-path access and deep merging over JSON configuration trees.

use crate::core::config::io::ConfigError;
use serde_json::{Map, Value};

/// Merges `overlay` into `base`.
///
/// Objects present on both sides merge key by key; any other overlay value
/// (scalars, arrays, `null`) replaces what `base` held at that key.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, incoming) in overlay {
        match incoming {
            Value::Object(incoming) => match base.get_mut(&key) {
                Some(Value::Object(existing)) => deep_merge(existing, incoming),
                _ => {
                    base.insert(key, Value::Object(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Looks up `key` (segments separated by `.`).
///
/// Returns `None` as soon as a segment is absent or the value reached so far
/// is not an object.
pub fn lookup<'a>(tree: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let first = segments.next()?;
    let mut current = tree.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Stores `value` at `key`, creating intermediate objects as needed.
///
/// Non-object values found along the path are replaced by empty objects.
pub fn assign(tree: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), ConfigError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(ConfigError::InvalidKey(key.to_string()));
    };

    let mut node = tree;
    for segment in parents {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        node = entry
            .as_object_mut()
            .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;
    }

    node.insert(leaf.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fixture is an object")
    }

    #[test]
    fn deep_merge_keeps_defaults_for_missing_keys() {
        let mut base = object(json!({
            "chat": {"default_model": "gpt-4o-mini", "temperature": 0.1},
            "ui": {"show_typing_indicator": true}
        }));
        deep_merge(&mut base, object(json!({"chat": {"temperature": 0.9}})));

        assert_eq!(base["chat"]["default_model"], "gpt-4o-mini");
        assert_eq!(base["chat"]["temperature"], 0.9);
        assert_eq!(base["ui"]["show_typing_indicator"], true);
    }

    #[test]
    fn deep_merge_lets_loaded_scalars_and_arrays_win() {
        let mut base = object(json!({
            "workspace": {"include_patterns": ["*.py", "*.js"]},
            "auth": {"token": null}
        }));
        deep_merge(
            &mut base,
            object(json!({
                "workspace": {"include_patterns": ["*.rs"]},
                "auth": "flattened"
            })),
        );

        assert_eq!(base["workspace"]["include_patterns"], json!(["*.rs"]));
        assert_eq!(base["auth"], "flattened");
    }

    #[test]
    fn deep_merge_adds_unknown_keys() {
        let mut base = object(json!({"chat": {}}));
        deep_merge(&mut base, object(json!({"plugins": {"enabled": true}})));
        assert_eq!(base["plugins"]["enabled"], true);
    }

    #[test]
    fn lookup_stops_at_non_object_segments() {
        let tree = object(json!({"a": {"b": 3}}));
        assert_eq!(lookup(&tree, "a.b"), Some(&json!(3)));
        assert_eq!(lookup(&tree, "a.b.c"), None);
        assert_eq!(lookup(&tree, "a.x"), None);
        assert_eq!(lookup(&tree, "missing"), None);
    }

    #[test]
    fn assign_creates_and_overwrites_intermediate_nodes() {
        let mut tree = object(json!({"a": 1}));
        assign(&mut tree, "a.b.c", json!(1)).expect("assign succeeds");
        assert_eq!(tree, object(json!({"a": {"b": {"c": 1}}})));

        assign(&mut tree, "a.b.d", json!("x")).expect("assign succeeds");
        assert_eq!(lookup(&tree, "a.b.c"), Some(&json!(1)));
        assert_eq!(lookup(&tree, "a.b.d"), Some(&json!("x")));
    }

    #[test]
    fn assign_rejects_empty_segments() {
        let mut tree = Map::new();
        for key in ["", "a..b", ".a", "a."] {
            let err = assign(&mut tree, key, json!(1)).expect_err("invalid key");
            assert!(matches!(err, ConfigError::InvalidKey(_)), "key {key:?}");
        }
        assert!(tree.is_empty());
    }
}
