//! JSON views of objects handed to templates.
//!
//! A view carries the object's own data and a `members` map of stubs
//! (`name` and `path` only). Templates never walk the tree through views:
//! they pass the stubs to the `filter_objects` filter, which looks the members
//! up again by path and returns full views.

use serde_json::{Map, Value, json};

use super::node::NodeKind;
use super::tree::ObjectRef;

/// Full view of an object.
#[must_use]
pub fn object_view(object: ObjectRef<'_>) -> Value {
    let mut view = Map::new();
    view.insert("name".into(), json!(object.name()));
    view.insert("path".into(), json!(object.path()));
    view.insert("canonical_path".into(), json!(object.canonical_path()));
    view.insert("is_alias".into(), json!(object.is_alias()));
    view.insert("inherited".into(), json!(object.inherited()));
    view.insert("lineno".into(), json!(object.lineno()));
    view.insert("is_public".into(), json!(object.is_public()));
    view.insert("has_docstring".into(), json!(object.has_docstring()));
    view.insert("has_docstrings".into(), json!(object.has_docstrings()));

    let kind = object.kind().map(|kind| kind.as_str()).unwrap_or("alias");
    view.insert("kind".into(), json!(kind));

    let docstring = object.docstring().filter(|docstring| !docstring.is_empty()).map(|docstring| {
        json!({
            "value": docstring.value,
            "summary": docstring.summary(),
            "lineno": docstring.lineno,
        })
    });
    view.insert("docstring".into(), docstring.unwrap_or(Value::Null));

    let target = object.final_target().unwrap_or(object);
    let node = target.node();
    view.insert("labels".into(), json!(node.labels));
    view.insert("extra".into(), Value::Object(node.extra.clone()));
    if let Some(parent) = object.parent() {
        view.insert("parent_path".into(), json!(parent.path()));
    }

    match &node.data {
        NodeKind::Module {
            exports,
            filepath,
        } => {
            view.insert("exports".into(), json!(exports));
            view.insert("filepath".into(), json!(filepath));
        }
        NodeKind::Class {
            bases,
        } => {
            view.insert("bases".into(), json!(bases));
        }
        NodeKind::Function {
            parameters,
            returns,
        } => {
            view.insert("parameters".into(), json!(parameters));
            view.insert("returns".into(), json!(returns));
        }
        NodeKind::Attribute {
            annotation,
            value,
        } => {
            view.insert("annotation".into(), json!(annotation));
            view.insert("value".into(), json!(value));
        }
        NodeKind::TypeAlias {
            value,
        } => {
            view.insert("value".into(), json!(value));
        }
        NodeKind::Alias {
            target_path,
        } => {
            view.insert("target_path".into(), json!(target_path));
        }
    }

    let members: Map<String, Value> = object
        .members()
        .into_iter()
        .map(|member| (member.name().to_string(), member_stub(member)))
        .collect();
    view.insert("members".into(), Value::Object(members));
    Value::Object(view)
}

/// Reference to a member, resolved again by path when filtered.
#[must_use]
pub fn member_stub(member: ObjectRef<'_>) -> Value {
    json!({ "name": member.name(), "path": member.path() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{NodeSpec, ObjectTree};

    #[test]
    fn test_view_lists_member_stubs() {
        let module = NodeSpec::new(
            "pkg",
            NodeKind::Module {
                exports: None,
                filepath: Some("pkg/__init__.py".to_string()),
            },
        )
        .with_docstring("Package.\n\nMore text.")
        .with_member(
            NodeSpec::new("VALUE", NodeKind::Attribute {
                annotation: Some("int".to_string()),
                value: Some("1".to_string()),
            })
            .with_lineno(3),
        );
        let mut tree = ObjectTree::new();
        let root = tree.insert_spec(None, module);

        let view = object_view(tree.get(root));
        assert_eq!(view["kind"], "module");
        assert_eq!(view["docstring"]["summary"], "Package.");
        assert_eq!(view["members"]["VALUE"]["path"], "pkg.VALUE");
        assert!(view["members"]["VALUE"].get("kind").is_none());
    }

    #[test]
    fn test_unresolved_alias_view() {
        let module = NodeSpec::new(
            "pkg",
            NodeKind::Module {
                exports: None,
                filepath: None,
            },
        )
        .with_member(NodeSpec::new("missing", NodeKind::Alias {
            target_path: "elsewhere.missing".to_string(),
        }));
        let mut tree = ObjectTree::new();
        tree.insert_spec(None, module);

        let view = object_view(tree.by_path("pkg.missing").unwrap());
        assert_eq!(view["kind"], "alias");
        assert_eq!(view["canonical_path"], "elsewhere.missing");
        assert_eq!(view["members"], json!({}));
    }
}
