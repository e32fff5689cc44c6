//! Summary sections built from member lists.
//!
//! Sections have the shape templates expect from parsed docstring sections:
//! `{"kind": "functions", "value": [{"name": ..., "description": ...}]}`.

use serde::Serialize;
use serde_json::Value;

use crate::objects::{NodeKind, ObjectRef};

/// Kind of a summary section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Attributes,
    Functions,
    Classes,
    Modules,
}

/// One row of a summary section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionItem {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub value: Vec<SectionItem>,
}

impl Section {
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn summary_line(object: &ObjectRef<'_>) -> String {
    object.docstring().map(|docstring| docstring.summary().to_string()).unwrap_or_default()
}

fn item(object: &ObjectRef<'_>, description: String) -> SectionItem {
    SectionItem {
        name: object.name().to_string(),
        description,
        annotation: None,
        value: None,
    }
}

/// Attributes section. Property summaries of the form `type: text` drop the
/// type when the docstring parser was asked to read it there.
#[must_use]
pub fn attributes_section(attributes: &[ObjectRef<'_>], check_public: bool) -> Section {
    let value = attributes
        .iter()
        .filter(|attribute| !check_public || attribute.is_public())
        .map(|attribute| {
            let mut description = summary_line(attribute);
            let type_in_summary = attribute.docstring().is_some_and(|docstring| {
                let option = docstring.parser_options.get("returns_type_in_property_summary");
                option == Some(&Value::Bool(true))
            });
            if type_in_summary {
                if let Some((_, rest)) = description.split_once(':') {
                    description = rest.to_string();
                }
            }
            let target = attribute.final_target().unwrap_or(*attribute);
            let (annotation, value) = match &target.node().data {
                NodeKind::Attribute {
                    annotation,
                    value,
                } => (annotation.clone(), value.clone()),
                _ => (None, None),
            };
            SectionItem {
                annotation,
                value,
                ..item(attribute, description)
            }
        })
        .collect();
    Section {
        kind: SectionKind::Attributes,
        value,
    }
}

/// Functions section. `__init__` is left out when it is merged into the class.
#[must_use]
pub fn functions_section(
    functions: &[ObjectRef<'_>],
    check_public: bool,
    merge_init_into_class: bool,
) -> Section {
    let value = functions
        .iter()
        .filter(|function| !check_public || function.is_public())
        .filter(|function| function.name() != "__init__" || !merge_init_into_class)
        .map(|function| item(function, summary_line(function)))
        .collect();
    Section {
        kind: SectionKind::Functions,
        value,
    }
}

#[must_use]
pub fn classes_section(classes: &[ObjectRef<'_>], check_public: bool) -> Section {
    simple_section(SectionKind::Classes, classes, check_public)
}

#[must_use]
pub fn modules_section(modules: &[ObjectRef<'_>], check_public: bool) -> Section {
    simple_section(SectionKind::Modules, modules, check_public)
}

fn simple_section(kind: SectionKind, objects: &[ObjectRef<'_>], check_public: bool) -> Section {
    let value = objects
        .iter()
        .filter(|object| !check_public || object.is_public())
        .map(|object| item(object, summary_line(object)))
        .collect();
    Section {
        kind,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::DocstringSpec;
    use crate::objects::Docstring;
    use crate::test_utils::fixtures::{attribute, function, module, tree_of};
    use serde_json::json;

    #[test]
    fn test_functions_section_skips_private_and_merged_init() {
        let tree = tree_of(vec![
            module("pkg")
                .with_member(function("run").with_docstring("Run it.\n\nMore text."))
                .with_member(function("_hidden").with_docstring("Hidden."))
                .with_member(function("__init__")),
        ]);
        let members = tree.by_path("pkg").unwrap().members();

        let section = functions_section(&members, true, true);
        let names: Vec<&str> = section.value.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["run"]);
        assert_eq!(section.value[0].description, "Run it.");

        let section = functions_section(&members, false, false);
        assert_eq!(section.value.len(), 3);
        assert_eq!(section.to_value()["kind"], json!("functions"));
    }

    #[test]
    fn test_attribute_summary_drops_type() {
        let mut typed = attribute("size");
        typed.docstring = Some(DocstringSpec::Full(Docstring {
            value: "int: The size.".to_string(),
            parser_options: serde_json::from_value(
                json!({"returns_type_in_property_summary": true}),
            )
            .unwrap(),
            ..Docstring::default()
        }));
        let tree = tree_of(vec![
            module("pkg")
                .with_member(typed)
                .with_member(attribute("plain").with_docstring("a: b")),
        ]);
        let members = tree.by_path("pkg").unwrap().members();
        let section = attributes_section(&members, true);
        assert_eq!(section.value[0].description, " The size.");
        assert_eq!(section.value[1].description, "a: b");
    }
}
