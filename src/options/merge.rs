//! Three-layer option merging.
//!
//! Precedence, highest first: local options of one invocation, global options
//! of the handler configuration, field defaults. Layers are overlaid
//! shallowly, except `extra` whose keys are unioned across layers.

use serde_json::{Map, Value};

use super::coerce::from_data;
use super::model::ResolvedOptions;
use crate::core::HandlerResult;

/// Overlay `layer` onto `target`, key by key, replacing values wholesale.
fn overlay(target: &mut Map<String, Value>, layer: &Map<String, Value>) {
    for (key, value) in layer {
        target.insert(key.clone(), value.clone());
    }
}

fn extra_of(layer: &Map<String, Value>) -> Map<String, Value> {
    match layer.get("extra") {
        Some(Value::Object(extra)) => extra.clone(),
        _ => Map::new(),
    }
}

/// Merge global and local option mappings into a new resolved record.
///
/// Neither input is modified. Unknown keys of both layers end up in
/// [`ResolvedOptions::unknown`], local values winning.
///
/// # Errors
///
/// [`HandlerError::Config`](crate::core::HandlerError::Config) naming the
/// offending option when the merged mapping does not coerce.
pub fn merge_options(
    global: &Map<String, Value>,
    local: &Map<String, Value>,
) -> HandlerResult<ResolvedOptions> {
    let mut extra = extra_of(global);
    overlay(&mut extra, &extra_of(local));

    let mut merged = global.clone();
    overlay(&mut merged, local);
    merged.insert("extra".to_string(), Value::Object(extra));

    from_data(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HandlerError;
    use crate::options::{DocstringStyle, MembersOption};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_local_overrides_global() {
        let global = map(json!({"show_source": false, "heading_level": 3}));
        let local = map(json!({"heading_level": 4}));
        let options = merge_options(&global, &local).unwrap();
        assert!(!options.show_source);
        assert_eq!(options.heading_level, 4);
        assert!(options.show_bases);
    }

    #[test]
    fn test_extra_is_unioned() {
        let global = map(json!({"extra": {"a": 1, "shared": "global"}}));
        let local = map(json!({"extra": {"b": 2, "shared": "local"}}));
        let options = merge_options(&global, &local).unwrap();
        assert_eq!(Value::Object(options.extra), json!({"a": 1, "shared": "local", "b": 2}));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let global = map(json!({"members": ["a"]}));
        let local = map(json!({"members": true}));
        let before = global.clone();
        let options = merge_options(&global, &local).unwrap();
        assert_eq!(global, before);
        assert_eq!(options.members, Some(MembersOption::All(true)));
    }

    #[test]
    fn test_local_docstring_style_applies_to_global_options() {
        let global = map(json!({"docstring_options": {"ignore_init_summary": true}}));
        let local = map(json!({"docstring_style": "numpy"}));
        let options = merge_options(&global, &local).unwrap();
        assert_eq!(options.docstring_style, Some(DocstringStyle::Numpy));
        assert_eq!(options.docstring_options.unwrap().style(), DocstringStyle::Numpy);
    }

    #[test]
    fn test_error_names_option() {
        let global = Map::new();
        let local = map(json!({"members_order": "random"}));
        let error = merge_options(&global, &local).unwrap_err();
        assert!(
            matches!(error, HandlerError::Config { ref option, .. } if option == "members_order")
        );
        assert!(error.to_string().contains("members_order"));
    }

    #[test]
    fn test_unknown_keys_kept_local_wins() {
        let global = map(json!({"legacy_flag": 1}));
        let local = map(json!({"legacy_flag": 2, "other": "x"}));
        let options = merge_options(&global, &local).unwrap();
        assert_eq!(options.unknown["legacy_flag"], 2);
        assert_eq!(options.unknown["other"], "x");
    }
}
