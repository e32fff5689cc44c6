//! Registry of recognized options.

/// Semantic group of an option, used for documentation and the JSON schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    General,
    Headings,
    Members,
    Docstrings,
    Signatures,
}

impl OptionGroup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Headings => "headings",
            Self::Members => "members",
            Self::Docstrings => "docstrings",
            Self::Signatures => "signatures",
        }
    }
}

/// A recognized top-level option.
#[derive(Debug, Clone, Copy)]
pub struct OptionField {
    pub name: &'static str,
    pub group: OptionGroup,
    pub description: &'static str,
}

const fn field(name: &'static str, group: OptionGroup, description: &'static str) -> OptionField {
    OptionField {
        name,
        group,
        description,
    }
}

use OptionGroup::{Docstrings, General, Headings, Members, Signatures};

/// Every option accepted in the global `options` mapping and in local options.
pub const OPTION_FIELDS: &[OptionField] = &[
    field(
        "allow_inspection",
        General,
        "Whether to allow inspecting modules when visiting them is not possible.",
    ),
    field(
        "force_inspection",
        General,
        "Whether to force using dynamic analysis when loading data.",
    ),
    field(
        "backlinks",
        General,
        "Whether to render backlinks, and how: \"flat\", \"tree\" or false.",
    ),
    field("extensions", General, "A list of loader extensions to use."),
    field(
        "find_stubs_package",
        General,
        "Whether to load stubs package (package-stubs) when extracting docstrings.",
    ),
    field(
        "preload_modules",
        General,
        "Pre-load modules that are not specified directly in autodoc instructions.",
    ),
    field("show_bases", General, "Show the base classes of a class."),
    field("show_source", General, "Show the source code of this object."),
    field("extra", General, "Extra options passed to templates."),
    field(
        "heading",
        Headings,
        "A custom string to override the autogenerated heading of the root object.",
    ),
    field("heading_level", Headings, "The initial heading level to use."),
    field("parameter_headings", Headings, "Whether to render headings for parameters."),
    field(
        "show_category_heading",
        Headings,
        "When grouped by categories, show a heading for each category.",
    ),
    field(
        "show_root_heading",
        Headings,
        "Show the heading of the object at the root of the documentation tree.",
    ),
    field("show_root_members_full_path", Headings, "Show the full path of the root members."),
    field(
        "show_root_toc_entry",
        Headings,
        "If the root heading is not shown, at least add a ToC entry for it.",
    ),
    field("show_symbol_type_heading", Headings, "Show the symbol type in headings."),
    field("show_symbol_type_toc", Headings, "Show the symbol type in the Table of Contents."),
    field(
        "toc_label",
        Headings,
        "A custom string to override the autogenerated toc label of the root object.",
    ),
    field(
        "filters",
        Members,
        "A list of filters, or \"public\". A filter starting with ! excludes matching objects.",
    ),
    field(
        "group_by_category",
        Members,
        "Group the object's children by categories: attributes, classes, functions, and modules.",
    ),
    field(
        "inherited_members",
        Members,
        "A boolean, or an explicit list of inherited members to render.",
    ),
    field("members", Members, "A boolean, or an explicit list of members to render."),
    field(
        "members_order",
        Members,
        "The members ordering to use: \"__all__\", \"alphabetical\", \"source\", or a list of them.",
    ),
    field("show_submodules", Members, "When rendering a module, show its submodules recursively."),
    field(
        "summary",
        Members,
        "Whether to render summaries of modules, classes, functions (methods) and attributes.",
    ),
    field("docstring_options", Docstrings, "The options for the docstring parser."),
    field(
        "docstring_section_style",
        Docstrings,
        "The style used to render docstring sections: table, list or spacy.",
    ),
    field(
        "docstring_style",
        Docstrings,
        "The docstring style to use: auto, google, numpy, sphinx, or null.",
    ),
    field(
        "merge_init_into_class",
        Docstrings,
        "Whether to merge the __init__ method into the class' signature and docstring.",
    ),
    field("relative_crossrefs", Docstrings, "Whether to enable the relative crossref syntax."),
    field("scoped_crossrefs", Docstrings, "Whether to enable the scoped crossref ability."),
    field(
        "show_docstring_attributes",
        Docstrings,
        "Whether to display the 'Attributes' section in the object's docstring.",
    ),
    field(
        "show_docstring_classes",
        Docstrings,
        "Whether to display the 'Classes' section in the object's docstring.",
    ),
    field(
        "show_docstring_description",
        Docstrings,
        "Whether to display the textual block (including admonitions) in the object's docstring.",
    ),
    field(
        "show_docstring_examples",
        Docstrings,
        "Whether to display the 'Examples' section in the object's docstring.",
    ),
    field(
        "show_docstring_functions",
        Docstrings,
        "Whether to display the 'Functions' or 'Methods' sections in the object's docstring.",
    ),
    field(
        "show_docstring_modules",
        Docstrings,
        "Whether to display the 'Modules' section in the object's docstring.",
    ),
    field(
        "show_docstring_other_parameters",
        Docstrings,
        "Whether to display the 'Other Parameters' section in the object's docstring.",
    ),
    field(
        "show_docstring_parameters",
        Docstrings,
        "Whether to display the 'Parameters' section in the object's docstring.",
    ),
    field(
        "show_docstring_raises",
        Docstrings,
        "Whether to display the 'Raises' section in the object's docstring.",
    ),
    field(
        "show_docstring_receives",
        Docstrings,
        "Whether to display the 'Receives' section in the object's docstring.",
    ),
    field(
        "show_docstring_returns",
        Docstrings,
        "Whether to display the 'Returns' section in the object's docstring.",
    ),
    field(
        "show_docstring_warns",
        Docstrings,
        "Whether to display the 'Warns' section in the object's docstring.",
    ),
    field(
        "show_docstring_yields",
        Docstrings,
        "Whether to display the 'Yields' section in the object's docstring.",
    ),
    field(
        "show_if_no_docstring",
        Docstrings,
        "Show the object heading even if it has no docstring or children with docstrings.",
    ),
    field(
        "show_inheritance_diagram",
        Docstrings,
        "Show the inheritance diagram of a class using Mermaid.",
    ),
    field("show_labels", Docstrings, "Whether to show labels of the members."),
    field("show_object_full_path", Docstrings, "Show the full Python path of every object."),
    field(
        "show_root_full_path",
        Docstrings,
        "Show the full Python path for the root object heading.",
    ),
    field(
        "annotations_path",
        Signatures,
        "The verbosity for annotations path: brief, source, or full.",
    ),
    field("line_length", Signatures, "Maximum line length when formatting code/signatures."),
    field(
        "modernize_annotations",
        Signatures,
        "Whether to modernize annotations, for example Optional[str] into str | None.",
    ),
    field(
        "separate_signature",
        Signatures,
        "Whether to put the whole signature in a code block below the heading.",
    ),
    field("show_overloads", Signatures, "Show the overloads of a function or method."),
    field("show_signature", Signatures, "Show methods and functions signatures."),
    field(
        "show_signature_annotations",
        Signatures,
        "Show the type annotations in methods and functions signatures.",
    ),
    field(
        "signature_crossrefs",
        Signatures,
        "Whether to render cross-references for type annotations in signatures.",
    ),
    field(
        "unwrap_annotated",
        Signatures,
        "Whether to unwrap Annotated types to show only the type without the annotations.",
    ),
];

/// Look up a recognized option by name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static OptionField> {
    OPTION_FIELDS.iter().find(|field| field.name == name)
}

#[must_use]
pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// Closest recognized option names to an unknown one.
///
/// Uses the Levenshtein distance, keeping names within half the length of the
/// unknown name, closest first, at most three.
#[must_use]
pub fn suggest(unknown: &str) -> Vec<&'static str> {
    let mut scored: Vec<_> = OPTION_FIELDS
        .iter()
        .map(|field| (field.name, strsim::levenshtein(unknown, field.name)))
        .filter(|(_, distance)| *distance <= unknown.len() / 2)
        .collect();
    scored.sort_by_key(|(_, distance)| *distance);
    scored.into_iter().take(3).map(|(name, _)| name).collect()
}
