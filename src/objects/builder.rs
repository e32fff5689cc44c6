//! Building object trees from serialized module dumps.
//!
//! A module dump is a nested JSON document of [`NodeSpec`] records, the
//! format read by [`JsonLoader`](crate::loader::JsonLoader):
//!
//! ```json
//! {
//!   "name": "package",
//!   "kind": "module",
//!   "docstring": "Package docstring.",
//!   "members": [
//!     {"name": "Base", "kind": "class", "lineno": 3, "members": [
//!       {"name": "method", "kind": "function", "lineno": 4}
//!     ]},
//!     {"name": "helper", "kind": "alias", "target_path": "other.helper", "lineno": 1}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::{Docstring, Node, NodeId, NodeKind};
use super::tree::ObjectTree;
use crate::options::DocstringStyle;

/// Docstrings can be given as plain text or as a full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocstringSpec {
    Text(String),
    Full(Docstring),
}

impl From<DocstringSpec> for Docstring {
    fn from(spec: DocstringSpec) -> Self {
        match spec {
            DocstringSpec::Text(value) => Self {
                value,
                ..Self::default()
            },
            DocstringSpec::Full(docstring) => docstring,
        }
    }
}

/// Serialized form of a node and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endlineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<DocstringSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<NodeSpec>,
    #[serde(flatten)]
    pub data: NodeKind,
}

impl NodeSpec {
    /// Minimal spec with the given name and data, used by tests and fixtures.
    pub fn new(name: impl Into<String>, data: NodeKind) -> Self {
        Self {
            name: name.into(),
            lineno: None,
            endlineno: None,
            docstring: None,
            public: None,
            labels: Vec::new(),
            extra: Map::new(),
            members: Vec::new(),
            data,
        }
    }

    #[must_use]
    pub fn with_lineno(mut self, lineno: u32) -> Self {
        self.lineno = Some(lineno);
        self
    }

    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(DocstringSpec::Text(docstring.into()));
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: NodeSpec) -> Self {
        self.members.push(member);
        self
    }
}

impl ObjectTree {
    /// Insert a spec (and its members, recursively) under `parent`.
    pub fn insert_spec(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let NodeSpec {
            name,
            lineno,
            endlineno,
            docstring,
            public,
            labels,
            extra,
            members,
            data,
        } = spec;
        let node = Node {
            name,
            path: String::new(),
            parent: None,
            members: Vec::new(),
            inherited: false,
            lineno,
            endlineno,
            docstring: docstring.map(Docstring::from),
            public,
            labels,
            extra,
            data,
        };
        let id = self.push(parent, node);
        for member in members {
            self.insert_spec(Some(id), member);
        }
        id
    }

    /// Attach inherited members to every class of the subtree rooted at `root`.
    ///
    /// Bases are walked depth-first, left to right; the first definition of a
    /// name wins and names defined directly on the class are never shadowed.
    /// Each inherited member is added as an alias with `inherited = true` and
    /// no line number of its own. Bases that cannot be resolved are skipped.
    pub fn attach_inherited_members(&mut self, root: NodeId) {
        let classes: Vec<NodeId> = self
            .subtree(root)
            .into_iter()
            .filter(|id| matches!(self.node(*id).data, NodeKind::Class { .. }))
            .collect();

        for class_id in classes {
            let inherited = self.collect_inherited(class_id);
            for (name, target_path) in inherited {
                let node = Node {
                    name,
                    path: String::new(),
                    parent: None,
                    members: Vec::new(),
                    inherited: true,
                    lineno: None,
                    endlineno: None,
                    docstring: None,
                    public: None,
                    labels: Vec::new(),
                    extra: Map::new(),
                    data: NodeKind::Alias {
                        target_path,
                    },
                };
                self.push(Some(class_id), node);
            }
        }
    }

    /// Record the docstring parser settings on every docstring of the subtree.
    pub fn apply_docstring_parser(
        &mut self,
        root: NodeId,
        parser: Option<DocstringStyle>,
        options: &Map<String, Value>,
    ) {
        for id in self.subtree(root) {
            self.set_docstring_parser(id, parser, options);
        }
    }

    /// Record the docstring parser settings on a single node, if it has a docstring.
    pub fn set_docstring_parser(
        &mut self,
        id: NodeId,
        parser: Option<DocstringStyle>,
        options: &Map<String, Value>,
    ) {
        if let Some(docstring) = self.node_mut(id).docstring.as_mut() {
            docstring.parser = parser;
            docstring.parser_options = options.clone();
        }
    }

    /// Ids of `root` and all its direct (non-alias) descendants.
    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut stack = vec![root];
        let mut found = Vec::new();
        while let Some(id) = stack.pop() {
            found.push(id);
            let node = self.node(id);
            if !node.is_alias() {
                stack.extend(node.members.iter().rev().copied());
            }
        }
        found
    }

    /// Names and target paths of members a class inherits from its bases.
    fn collect_inherited(&self, class_id: NodeId) -> Vec<(String, String)> {
        let class = self.get(class_id);
        let mut seen: Vec<String> = class
            .node()
            .members
            .iter()
            .map(|id| self.node(*id).name.clone())
            .collect();
        let mut visited_bases = vec![class.path().to_string()];
        let mut inherited = Vec::new();

        let mut pending: Vec<String> = match &class.node().data {
            NodeKind::Class {
                bases,
            } => bases.iter().rev().cloned().collect(),
            _ => Vec::new(),
        };
        while let Some(base_path) = pending.pop() {
            let Some(base) = self.by_path(&base_path).and_then(|base| base.final_target().ok())
            else {
                tracing::debug!("Skipping unresolved base {base_path} of {}", class.path());
                continue;
            };
            if visited_bases.iter().any(|visited| visited == base.path()) {
                continue;
            }
            visited_bases.push(base.path().to_string());

            for member in base.members() {
                if member.inherited() || seen.iter().any(|name| name == member.name()) {
                    continue;
                }
                seen.push(member.name().to_string());
                inherited.push((member.name().to_string(), member.path().to_string()));
            }
            if let NodeKind::Class {
                bases,
            } = &base.node().data
            {
                pending.extend(bases.iter().rev().cloned());
            }
        }
        inherited
    }
}
