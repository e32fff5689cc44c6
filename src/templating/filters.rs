//! Tera filters and tests registered for every render.
//!
//! Templates only see JSON views of objects (see
//! [`object_view`](crate::objects::object_view)). Filters that need the real
//! objects look them up again by path in the tree shared through
//! [`RenderState`], and default their options to the options of the render.
//!
//! | Filter | Input | Arguments |
//! |---|---|---|
//! | `filter_objects` | members map or list | `filters`, `members_list`, `root`, `inherited_members`, `keep_no_docstrings` |
//! | `order_members` | list of views | `order`, `members_list`, `root` |
//! | `split_path` | path | `full_path` |
//! | `format_code` | code | `line_length` |
//! | `format_signature` | function view | `path`, `line_length`, `annotations`, `crossrefs` |
//! | `format_attribute` | attribute view | `path`, `line_length`, `crossrefs` |
//! | `stash_crossref` | markup | `length` |
//! | `get_template` | view or template name | |
//! | `as_*_section` | list of views | `check_public` |

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use tera::{Tera, Value};

use super::sections;
use super::stash::CrossrefStash;
use crate::formatter::{Formatter, format_code, format_signature_text};
use crate::members::{MemberSelection, filter_objects, order_members};
use crate::objects::{NodeKind, ObjectRef, ObjectTree, ParameterKind, object_view};
use crate::options::{
    AnnotationsPath, Filters, InheritedMembers, MembersOption, MembersOrder, ResolvedOptions,
};
use crate::paths::split_path;

/// Everything the filters of one render share.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub tree: Arc<ObjectTree>,
    pub options: Arc<ResolvedOptions>,
    pub stash: CrossrefStash,
    pub formatter: Arc<dyn Formatter>,
}

type Args = HashMap<String, Value>;

fn arg<T: DeserializeOwned>(args: &Args, name: &str) -> tera::Result<Option<T>> {
    match args.get(name) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|error| tera::Error::msg(format!("invalid `{name}` argument: {error}"))),
    }
}

fn lookup<'a>(tree: &'a ObjectTree, value: &Value) -> tera::Result<ObjectRef<'a>> {
    let path = match value {
        Value::String(path) => path.as_str(),
        Value::Object(view) => view
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| tera::Error::msg("expected an object with a `path`"))?,
        other => return Err(tera::Error::msg(format!("expected an object, got {other}"))),
    };
    match tree.by_path(path) {
        Some(object) => Ok(object),
        None => tree.find(path).map_err(|error| tera::Error::msg(error.to_string())),
    }
}

/// Items of a members map (name to member) or of a list.
fn items(value: &Value) -> tera::Result<Vec<&Value>> {
    match value {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(tera::Error::msg(format!("expected a list of objects, got {other}"))),
    }
}

fn lookup_all<'a>(tree: &'a ObjectTree, value: &Value) -> tera::Result<Vec<ObjectRef<'a>>> {
    items(value)?.into_iter().map(|item| lookup(tree, item)).collect()
}

fn views(objects: &[ObjectRef<'_>]) -> Value {
    Value::Array(objects.iter().map(|object| object_view(*object)).collect())
}

/// Explicit `members_list` (`null` meaning no list), else the `members` option
/// when rendering the members of the root object (`root`, true by default).
fn members_list(args: &Args, options: &ResolvedOptions) -> tera::Result<Option<MembersOption>> {
    if let Some(members) = arg::<Option<MembersOption>>(args, "members_list")? {
        return Ok(members);
    }
    let root: bool = arg(args, "root")?.unwrap_or(true);
    Ok(if root { options.members.clone() } else { None })
}

pub fn filter_objects_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let options = &state.options;
        let filters: Filters = arg(args, "filters")?.unwrap_or_else(|| options.filters.clone());
        let members = members_list(args, options)?;
        let inherited_members: InheritedMembers =
            arg(args, "inherited_members")?.unwrap_or_else(|| options.inherited_members.clone());
        let keep_no_docstrings: bool =
            arg(args, "keep_no_docstrings")?.unwrap_or_else(|| options.keep_no_docstrings());

        let objects = lookup_all(&state.tree, value)?;
        let selection = MemberSelection {
            filters: &filters,
            members: members.as_ref(),
            inherited_members: &inherited_members,
            keep_no_docstrings,
        };
        Ok(views(&filter_objects(&objects, &selection)))
    }
}

pub fn order_members_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let order: MembersOrder =
            arg(args, "order")?.unwrap_or_else(|| state.options.members_order.clone());
        let members = members_list(args, &state.options)?;

        let inputs = items(value)?;
        let objects: Vec<ObjectRef<'_>> =
            inputs.iter().map(|item| lookup(&state.tree, item)).collect::<tera::Result<_>>()?;
        let ordered = order_members(&objects, &order, members.as_ref());
        let by_path: HashMap<&str, &Value> = objects
            .iter()
            .zip(inputs.iter())
            .map(|(object, item)| (object.path(), *item))
            .collect();
        Ok(Value::Array(
            ordered
                .iter()
                .filter_map(|object| by_path.get(object.path()).map(|item| (*item).clone()))
                .collect(),
        ))
    }
}

pub fn split_path_filter() -> impl tera::Filter + 'static {
    |value: &Value, args: &Args| -> tera::Result<Value> {
        let path = value.as_str().ok_or_else(|| tera::Error::msg("split_path expects a string"))?;
        let full_path: String = arg(args, "full_path")?.unwrap_or_else(|| path.to_string());
        serde_json::to_value(split_path(path, &full_path)).map_err(tera::Error::json)
    }
}

pub fn format_code_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let code = value.as_str().ok_or_else(|| tera::Error::msg("format_code expects a string"))?;
        let line_length: usize = arg(args, "line_length")?.unwrap_or(state.options.line_length);
        Ok(Value::String(format_code(code, line_length, state.formatter.as_ref())))
    }
}

pub fn stash_crossref_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let crossref = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("stash_crossref expects a string"))?;
        let length: usize = arg(args, "length")?
            .ok_or_else(|| tera::Error::msg("stash_crossref requires a `length`"))?;
        Ok(Value::String(state.stash.stash(crossref, length)))
    }
}

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*")
            .expect("identifier pattern is valid")
    })
}

/// Render an annotation, shortening names and stashing cross-references as configured.
fn annotation_text(
    annotation: &str,
    options: &ResolvedOptions,
    stash: Option<&CrossrefStash>,
) -> String {
    let mut text = String::new();
    let mut last = 0;
    for found in identifier_regex().find_iter(annotation) {
        text.push_str(&annotation[last..found.start()]);
        last = found.end();
        let name = found.as_str();
        let display = match options.annotations_path {
            AnnotationsPath::Brief => name.rsplit('.').next().unwrap_or(name),
            AnnotationsPath::Source | AnnotationsPath::Full => name,
        };
        match stash {
            Some(stash) if !matches!(name, "None" | "True" | "False") => {
                let markup =
                    format!(r#"<autoref identifier="{name}" optional hover>{display}</autoref>"#);
                text.push_str(&stash.stash(markup, display.len()));
            }
            _ => text.push_str(display),
        }
    }
    text.push_str(&annotation[last..]);
    text
}

/// Parameters and return annotation of a function, as `(a: int = 1, /, *, b) -> str`.
fn signature_text(
    object: ObjectRef<'_>,
    options: &ResolvedOptions,
    stash: Option<&CrossrefStash>,
) -> String {
    let target = object.final_target().unwrap_or(object);
    let NodeKind::Function {
        parameters,
        returns,
    } = &target.node().data
    else {
        return String::new();
    };
    let annotations = options.show_signature_annotations;

    let mut rendered = Vec::new();
    let mut previous: Option<ParameterKind> = None;
    let mut star_seen = false;
    for parameter in parameters {
        if previous == Some(ParameterKind::PositionalOnly)
            && parameter.kind != ParameterKind::PositionalOnly
        {
            rendered.push("/".to_string());
        }
        if parameter.kind == ParameterKind::KeywordOnly && !star_seen {
            rendered.push("*".to_string());
        }
        if matches!(parameter.kind, ParameterKind::VarPositional | ParameterKind::KeywordOnly) {
            star_seen = true;
        }

        let mut text = match parameter.kind {
            ParameterKind::VarPositional => format!("*{}", parameter.name),
            ParameterKind::VarKeyword => format!("**{}", parameter.name),
            _ => parameter.name.clone(),
        };
        let annotated = annotations && parameter.annotation.is_some();
        if annotated {
            if let Some(annotation) = &parameter.annotation {
                text.push_str(": ");
                text.push_str(&annotation_text(annotation, options, stash));
            }
        }
        if let Some(default) = &parameter.default {
            text.push_str(if annotated { " = " } else { "=" });
            text.push_str(default);
        }
        rendered.push(text);
        previous = Some(parameter.kind);
    }
    if previous == Some(ParameterKind::PositionalOnly) {
        rendered.push("/".to_string());
    }

    let mut signature = format!("({})", rendered.join(", "));
    if annotations {
        if let Some(returns) = returns {
            signature.push_str(" -> ");
            signature.push_str(&annotation_text(returns, options, stash));
        }
    }
    signature
}

fn highlight(code: &str, stash: &CrossrefStash) -> String {
    let escaped = tera::escape_html(code);
    format!(
        r#"<div class="doc-signature highlight"><pre><code>{}</code></pre></div>"#,
        stash.restore(&escaped)
    )
}

pub fn format_signature_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let object = lookup(&state.tree, value)?;
        let path: String = arg(args, "path")?.unwrap_or_else(|| object.path().to_string());
        let line_length: usize = arg(args, "line_length")?.unwrap_or(state.options.line_length);
        let crossrefs: bool = arg(args, "crossrefs")?.unwrap_or(state.options.signature_crossrefs);
        let options = match arg::<bool>(args, "annotations")? {
            Some(show) => Cow::Owned(ResolvedOptions {
                show_signature_annotations: show,
                ..(*state.options).clone()
            }),
            None => Cow::Borrowed(state.options.as_ref()),
        };

        let stash = crossrefs.then_some(&state.stash);
        let signature = signature_text(object, &options, stash);
        let formatted =
            format_signature_text(&path, &signature, line_length, state.formatter.as_ref());
        Ok(Value::String(highlight(&formatted, &state.stash)))
    }
}

pub fn format_attribute_filter(state: RenderState) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let object = lookup(&state.tree, value)?;
        let path: String = arg(args, "path")?.unwrap_or_else(|| object.path().to_string());
        let line_length: usize = arg(args, "line_length")?.unwrap_or(state.options.line_length);
        let crossrefs: bool = arg(args, "crossrefs")?.unwrap_or(state.options.signature_crossrefs);
        let stash = crossrefs.then_some(&state.stash);

        let target = object.final_target().unwrap_or(object);
        let mut signature = path.trim().to_string();
        if let NodeKind::Attribute {
            annotation,
            value,
        } = &target.node().data
        {
            if state.options.show_signature_annotations {
                if let Some(annotation) = annotation {
                    signature.push_str(": ");
                    signature.push_str(&annotation_text(annotation, &state.options, stash));
                }
            }
            if let Some(value) = value {
                signature.push_str(" = ");
                signature.push_str(value);
            }
        }
        let formatted = format_code(&signature, line_length, state.formatter.as_ref());
        Ok(Value::String(highlight(&formatted, &state.stash)))
    }
}

/// Template used to render an object: an `extra.mkdocstrings.template`
/// override, or the template named after the object's kind.
#[must_use]
pub fn template_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(format!("{name}.html")),
        Value::Object(view) => {
            let custom = view
                .get("extra")
                .and_then(|extra| extra.get("mkdocstrings"))
                .and_then(|mkdocstrings| mkdocstrings.get("template"))
                .and_then(Value::as_str)
                .filter(|template| !template.is_empty());
            match custom {
                Some(template) => Some(template.to_string()),
                None => view.get("kind").and_then(Value::as_str).map(|kind| format!("{kind}.html")),
            }
        }
        _ => None,
    }
}

pub fn get_template_filter() -> impl tera::Filter + 'static {
    |value: &Value, _args: &Args| -> tera::Result<Value> {
        template_name(value)
            .map(Value::String)
            .ok_or_else(|| tera::Error::msg("get_template expects an object or a template name"))
    }
}

#[derive(Debug, Clone, Copy)]
enum SectionFilter {
    Attributes,
    Functions,
    Classes,
    Modules,
}

fn section_filter(state: RenderState, kind: SectionFilter) -> impl tera::Filter + 'static {
    move |value: &Value, args: &Args| -> tera::Result<Value> {
        let check_public: bool = arg(args, "check_public")?.unwrap_or(true);
        let objects = lookup_all(&state.tree, value)?;
        let section = match kind {
            SectionFilter::Attributes => sections::attributes_section(&objects, check_public),
            SectionFilter::Functions => sections::functions_section(
                &objects,
                check_public,
                state.options.merge_init_into_class,
            ),
            SectionFilter::Classes => sections::classes_section(&objects, check_public),
            SectionFilter::Modules => sections::modules_section(&objects, check_public),
        };
        Ok(section.to_value())
    }
}

/// `existing_template` test: whether a template of that name is loaded.
pub fn existing_template_tester(names: HashSet<String>) -> impl tera::Test + 'static {
    move |value: Option<&Value>, _args: &[Value]| -> tera::Result<bool> {
        Ok(value.and_then(Value::as_str).is_some_and(|name| names.contains(name)))
    }
}

/// Register every filter and test on `tera`.
pub fn register(tera: &mut Tera, state: &RenderState) {
    tera.register_filter("filter_objects", filter_objects_filter(state.clone()));
    tera.register_filter("order_members", order_members_filter(state.clone()));
    tera.register_filter("split_path", split_path_filter());
    tera.register_filter("format_code", format_code_filter(state.clone()));
    tera.register_filter("format_signature", format_signature_filter(state.clone()));
    tera.register_filter("format_attribute", format_attribute_filter(state.clone()));
    tera.register_filter("stash_crossref", stash_crossref_filter(state.clone()));
    tera.register_filter("get_template", get_template_filter());
    let sections = [
        ("as_attributes_section", SectionFilter::Attributes),
        ("as_functions_section", SectionFilter::Functions),
        ("as_classes_section", SectionFilter::Classes),
        ("as_modules_section", SectionFilter::Modules),
    ];
    for (name, kind) in sections {
        tera.register_filter(name, section_filter(state.clone(), kind));
    }

    let names: HashSet<String> = tera.get_template_names().map(ToString::to_string).collect();
    tera.register_tester("existing_template", existing_template_tester(names));
}
