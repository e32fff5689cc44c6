//! JSON Schema (draft-07) of the handler options, for editor integration.

use serde_json::{Map, Value, json};

use super::fields::OPTION_FIELDS;
use super::model::ResolvedOptions;

const SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Type constraints that cannot be inferred from the default value.
fn declared_type(name: &str) -> Option<Value> {
    let declared = match name {
        "backlinks" => json!({"enum": ["flat", "tree", false]}),
        "filters" => json!({
            "oneOf": [
                {"type": "array", "items": {"type": "string"}},
                {"const": "public"}
            ]
        }),
        "inherited_members" | "members" => json!({
            "oneOf": [
                {"type": "boolean"},
                {"type": "array", "items": {"type": "string"}},
                {"type": "null"}
            ]
        }),
        "members_order" => json!({
            "oneOf": [
                {"enum": ["__all__", "alphabetical", "source"]},
                {"type": "array", "items": {"enum": ["__all__", "alphabetical", "source"]}}
            ]
        }),
        "summary" => json!({
            "oneOf": [
                {"type": "boolean"},
                {
                    "type": "object",
                    "properties": {
                        "attributes": {"type": "boolean"},
                        "functions": {"type": "boolean"},
                        "classes": {"type": "boolean"},
                        "modules": {"type": "boolean"}
                    },
                    "additionalProperties": false
                }
            ]
        }),
        "docstring_options" => json!({"type": ["object", "null"]}),
        "docstring_section_style" => json!({"enum": ["table", "list", "spacy"]}),
        "docstring_style" => json!({"enum": ["auto", "google", "numpy", "sphinx", null]}),
        "annotations_path" => json!({"enum": ["brief", "source", "full"]}),
        "extensions" => json!({
            "type": "array",
            "items": {"oneOf": [{"type": "string"}, {"type": "object"}]}
        }),
        _ => return None,
    };
    Some(declared)
}

fn inferred_type(default: &Value) -> Value {
    let name = match default {
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_u64() || number.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    };
    json!({ "type": name })
}

/// Build the schema document of every recognized option.
#[must_use]
pub fn options_json_schema() -> Value {
    let defaults = match serde_json::to_value(ResolvedOptions::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => Map::new(),
    };

    let mut properties = Map::new();
    for field in OPTION_FIELDS {
        let default = defaults.get(field.name).cloned().unwrap_or(Value::Null);
        let declared = declared_type(field.name).unwrap_or_else(|| inferred_type(&default));
        let mut property = match declared {
            Value::Object(property) => property,
            _ => Map::new(),
        };
        property.insert("title".to_string(), json!(field.description));
        property.insert("description".to_string(), json!(field.description));
        property.insert("group".to_string(), json!(field.group.as_str()));
        property.insert("default".to_string(), default);
        properties.insert(field.name.to_string(), Value::Object(property));
    }

    json!({
        "$schema": SCHEMA_DRAFT,
        "title": "Python handler options",
        "type": "object",
        "properties": properties,
        "additionalProperties": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_every_option() {
        let schema = options_json_schema();
        assert_eq!(schema["$schema"], SCHEMA_DRAFT);
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), OPTION_FIELDS.len());
        assert_eq!(properties["line_length"]["type"], "integer");
        assert_eq!(properties["line_length"]["default"], 60);
        assert_eq!(properties["filters"]["default"], json!(["!^_[^_]"]));
        assert_eq!(properties["show_labels"]["group"], "docstrings");
    }
}
