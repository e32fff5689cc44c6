//! The resolved option record and its enumerated option types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::docstrings::{DocstringOptions, DocstringStyle};
use super::filters::Filters;

/// Backlinks display: a flat list, a tree, or none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Backlinks {
    Flat,
    Tree,
    #[default]
    Disabled,
}

impl TryFrom<Value> for Backlinks {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(false) => Ok(Self::Disabled),
            Value::String(style) if style == "flat" => Ok(Self::Flat),
            Value::String(style) if style == "tree" => Ok(Self::Tree),
            other => Err(format!("expected \"flat\", \"tree\" or false, found {other}")),
        }
    }
}

impl From<Backlinks> for Value {
    fn from(backlinks: Backlinks) -> Self {
        match backlinks {
            Backlinks::Flat => Self::from("flat"),
            Backlinks::Tree => Self::from("tree"),
            Backlinks::Disabled => Self::Bool(false),
        }
    }
}

/// `inherited_members`: every inherited member, none, or the named ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InheritedMembers {
    All(bool),
    Names(Vec<String>),
}

impl Default for InheritedMembers {
    fn default() -> Self {
        Self::All(false)
    }
}

/// `members`: keep everything (`true`), nothing (`false`), or the named ones.
///
/// Absence of the option (`None` on the record) defers to filters and docstrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MembersOption {
    All(bool),
    Names(Vec<String>),
}

/// A single member ordering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderMethod {
    /// Declaration order of the module's `__all__`
    #[serde(rename = "__all__")]
    DunderAll,
    #[serde(rename = "alphabetical")]
    Alphabetical,
    #[serde(rename = "source")]
    Source,
}

/// `members_order`: one method, or methods tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MembersOrder {
    One(OrderMethod),
    Chain(Vec<OrderMethod>),
}

impl MembersOrder {
    #[must_use]
    pub fn methods(&self) -> Vec<OrderMethod> {
        match self {
            Self::One(method) => vec![*method],
            Self::Chain(methods) => methods.clone(),
        }
    }
}

impl Default for MembersOrder {
    fn default() -> Self {
        Self::One(OrderMethod::Alphabetical)
    }
}

/// Which member summaries to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryOption {
    pub attributes: bool,
    pub functions: bool,
    pub classes: bool,
    pub modules: bool,
}

impl SummaryOption {
    #[must_use]
    pub const fn all(enabled: bool) -> Self {
        Self {
            attributes: enabled,
            functions: enabled,
            classes: enabled,
            modules: enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStyle {
    #[default]
    Table,
    List,
    Spacy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationsPath {
    #[default]
    Brief,
    Source,
    Full,
}

/// Options used for one collect/render invocation.
///
/// Built by [`from_data`](super::from_data) or [`merge_options`](super::merge_options)
/// and never mutated afterwards: variants for nested renders are derived with
/// struct update syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedOptions {
    // general
    pub allow_inspection: bool,
    pub force_inspection: bool,
    pub backlinks: Backlinks,
    pub extensions: Vec<Value>,
    pub find_stubs_package: bool,
    pub preload_modules: Vec<String>,
    pub show_bases: bool,
    pub show_source: bool,
    /// Free-form values for custom templates
    pub extra: Map<String, Value>,

    // headings
    pub heading: String,
    pub heading_level: u32,
    pub parameter_headings: bool,
    pub show_category_heading: bool,
    pub show_root_heading: bool,
    pub show_root_members_full_path: bool,
    pub show_root_toc_entry: bool,
    pub show_symbol_type_heading: bool,
    pub show_symbol_type_toc: bool,
    pub toc_label: String,

    // members
    pub filters: Filters,
    pub group_by_category: bool,
    pub inherited_members: InheritedMembers,
    pub members: Option<MembersOption>,
    pub members_order: MembersOrder,
    pub show_submodules: bool,
    pub summary: SummaryOption,

    // docstrings
    pub docstring_options: Option<DocstringOptions>,
    pub docstring_section_style: SectionStyle,
    pub docstring_style: Option<DocstringStyle>,
    pub merge_init_into_class: bool,
    pub relative_crossrefs: bool,
    pub scoped_crossrefs: bool,
    pub show_docstring_attributes: bool,
    pub show_docstring_classes: bool,
    pub show_docstring_description: bool,
    pub show_docstring_examples: bool,
    pub show_docstring_functions: bool,
    pub show_docstring_modules: bool,
    pub show_docstring_other_parameters: bool,
    pub show_docstring_parameters: bool,
    pub show_docstring_raises: bool,
    pub show_docstring_receives: bool,
    pub show_docstring_returns: bool,
    pub show_docstring_warns: bool,
    pub show_docstring_yields: bool,
    pub show_if_no_docstring: bool,
    pub show_inheritance_diagram: bool,
    pub show_labels: bool,
    pub show_object_full_path: bool,
    pub show_root_full_path: bool,

    // signatures
    pub annotations_path: AnnotationsPath,
    pub line_length: usize,
    pub modernize_annotations: bool,
    pub separate_signature: bool,
    pub show_overloads: bool,
    pub show_signature: bool,
    pub show_signature_annotations: bool,
    pub signature_crossrefs: bool,
    pub unwrap_annotated: bool,

    /// Unrecognized top-level keys, kept for templates that still read them
    /// as options. Serialized flat, next to the known options.
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            allow_inspection: true,
            force_inspection: false,
            backlinks: Backlinks::Disabled,
            extensions: Vec::new(),
            find_stubs_package: false,
            preload_modules: Vec::new(),
            show_bases: true,
            show_source: true,
            extra: Map::new(),

            heading: String::new(),
            heading_level: 2,
            parameter_headings: false,
            show_category_heading: false,
            show_root_heading: false,
            show_root_members_full_path: false,
            show_root_toc_entry: true,
            show_symbol_type_heading: false,
            show_symbol_type_toc: false,
            toc_label: String::new(),

            filters: Filters::default(),
            group_by_category: true,
            inherited_members: InheritedMembers::default(),
            members: None,
            members_order: MembersOrder::default(),
            show_submodules: false,
            summary: SummaryOption::default(),

            docstring_options: None,
            docstring_section_style: SectionStyle::Table,
            docstring_style: Some(DocstringStyle::Google),
            merge_init_into_class: false,
            relative_crossrefs: false,
            scoped_crossrefs: false,
            show_docstring_attributes: true,
            show_docstring_classes: true,
            show_docstring_description: true,
            show_docstring_examples: true,
            show_docstring_functions: true,
            show_docstring_modules: true,
            show_docstring_other_parameters: true,
            show_docstring_parameters: true,
            show_docstring_raises: true,
            show_docstring_receives: true,
            show_docstring_returns: true,
            show_docstring_warns: true,
            show_docstring_yields: true,
            show_if_no_docstring: false,
            show_inheritance_diagram: false,
            show_labels: true,
            show_object_full_path: false,
            show_root_full_path: true,

            annotations_path: AnnotationsPath::Brief,
            line_length: 60,
            modernize_annotations: false,
            separate_signature: false,
            show_overloads: true,
            show_signature: true,
            show_signature_annotations: false,
            signature_crossrefs: false,
            unwrap_annotated: false,

            unknown: Map::new(),
        }
    }
}

impl ResolvedOptions {
    /// Parser options for the configured docstring style.
    ///
    /// Explicit `docstring_options` win; otherwise the style's defaults.
    #[must_use]
    pub fn docstring_parser_options(&self) -> Map<String, Value> {
        if let Some(options) = &self.docstring_options {
            return options.parser_options();
        }
        let defaults = match self.docstring_style {
            Some(DocstringStyle::Google) => {
                DocstringOptions::Google(super::docstrings::GoogleStyleOptions::default())
            }
            Some(DocstringStyle::Numpy) => {
                DocstringOptions::Numpy(super::docstrings::NumpyStyleOptions::default())
            }
            Some(DocstringStyle::Sphinx) => {
                DocstringOptions::Sphinx(super::docstrings::SphinxStyleOptions::default())
            }
            Some(DocstringStyle::Auto) => {
                DocstringOptions::Auto(super::docstrings::AutoStyleOptions::default())
            }
            None => return Map::new(),
        };
        defaults.parser_options()
    }

    /// Whether member filtering keeps members without docstrings.
    #[must_use]
    pub fn keep_no_docstrings(&self) -> bool {
        self.show_if_no_docstring
    }

    /// Value passed to templates as `config`: every option with legacy
    /// unknown keys flattened next to them.
    #[must_use]
    pub fn template_config(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}
