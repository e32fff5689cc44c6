//! Node records stored in the [`ObjectTree`](super::ObjectTree) arena.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::DocstringStyle;

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

/// Kind tag of a documentable object.
///
/// Aliases do not have a kind of their own: they report the kind of their
/// final target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Module,
    Class,
    Function,
    Attribute,
    TypeAlias,
}

impl Kind {
    /// Name used in templates and in the template context.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Class => "class",
            Self::Function => "function",
            Self::Attribute => "attribute",
            Self::TypeAlias => "type_alias",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A docstring attached to an object, with the parser settings used to read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Docstring {
    /// Raw docstring text
    pub value: String,
    /// Line where the docstring starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    /// Docstring style used to parse this docstring
    #[serde(default)]
    pub parser: Option<DocstringStyle>,
    /// Options passed to the docstring parser
    #[serde(default)]
    pub parser_options: Map<String, Value>,
}

impl Docstring {
    /// Whether the docstring has any non-whitespace content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// First line of the docstring, used in summary tables.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.value.split('\n').next().unwrap_or_default()
    }
}

/// How a function parameter can be passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// A function parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Option<String>,
}

/// Kind-specific data of a node.
///
/// This is a closed set: the handler dispatches on the variant instead of
/// relying on open extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Module {
        /// Names declared in `__all__`, when the module declares it
        #[serde(default)]
        exports: Option<Vec<String>>,
        #[serde(default)]
        filepath: Option<String>,
    },
    Class {
        /// Canonical paths of the base classes, in declaration order
        #[serde(default)]
        bases: Vec<String>,
    },
    Function {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        returns: Option<String>,
    },
    Attribute {
        #[serde(default)]
        annotation: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
    TypeAlias {
        #[serde(default)]
        value: Option<String>,
    },
    Alias {
        /// Path of the object this alias stands for
        target_path: String,
    },
}

impl NodeKind {
    /// Kind tag, `None` for aliases.
    #[must_use]
    pub const fn kind(&self) -> Option<Kind> {
        match self {
            Self::Module { .. } => Some(Kind::Module),
            Self::Class { .. } => Some(Kind::Class),
            Self::Function { .. } => Some(Kind::Function),
            Self::Attribute { .. } => Some(Kind::Attribute),
            Self::TypeAlias { .. } => Some(Kind::TypeAlias),
            Self::Alias { .. } => None,
        }
    }
}

/// A node of the object tree.
///
/// `parent` is a back-reference by index: nodes never own their parent.
/// `members` keeps insertion order, which is the "source order" of the
/// members as the loader found them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub path: String,
    pub parent: Option<NodeId>,
    pub members: Vec<NodeId>,
    /// Member reached through base classes rather than defined directly
    pub inherited: bool,
    /// For aliases, the line of the import/re-export statement
    pub lineno: Option<u32>,
    pub endlineno: Option<u32>,
    pub docstring: Option<Docstring>,
    /// Explicit visibility set by the loader, overriding conventions
    pub public: Option<bool>,
    pub labels: Vec<String>,
    /// Free-form data attached by loader extensions
    pub extra: Map<String, Value>,
    pub data: NodeKind,
}

impl Node {
    /// Whether the name follows the private naming convention (`_x`, not `__x__`).
    #[must_use]
    pub fn has_private_name(&self) -> bool {
        let special = self.name.starts_with("__") && self.name.ends_with("__");
        self.name.starts_with('_') && !special
    }

    #[must_use]
    pub const fn is_alias(&self) -> bool {
        matches!(self.data, NodeKind::Alias { .. })
    }

    /// Target path for aliases.
    #[must_use]
    pub fn target_path(&self) -> Option<&str> {
        match &self.data {
            NodeKind::Alias { target_path } => Some(target_path),
            _ => None,
        }
    }
}
