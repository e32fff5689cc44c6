//! Arena tree of documentable objects and the read-only [`ObjectRef`] view.

use std::collections::{HashMap, HashSet};

use super::node::{Docstring, Kind, Node, NodeId, NodeKind};
use crate::core::{HandlerError, HandlerResult};

/// All objects loaded so far, indexed by path.
///
/// Nodes are appended and never removed; the tree is only mutated by loaders
/// (adding modules, attaching inherited members, patching docstring parser
/// settings). Filtering and ordering work on shared references.
#[derive(Debug, Clone, Default)]
pub struct ObjectTree {
    nodes: Vec<Node>,
    by_path: HashMap<String, NodeId>,
    roots: Vec<NodeId>,
}

impl ObjectTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node. Ids are only handed out by this tree, so they are always valid.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Read-only view over a node.
    #[must_use]
    pub const fn get(&self, id: NodeId) -> ObjectRef<'_> {
        ObjectRef {
            tree: self,
            id,
        }
    }

    /// Names of the loaded top-level modules.
    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(|id| self.node(*id).name.as_str())
    }

    #[must_use]
    pub fn root(&self, name: &str) -> Option<ObjectRef<'_>> {
        self.roots.iter().find(|id| self.node(**id).name == name).map(|id| self.get(*id))
    }

    /// Exact lookup by path, without traversing aliases.
    #[must_use]
    pub fn by_path(&self, path: &str) -> Option<ObjectRef<'_>> {
        self.by_path.get(path).map(|id| self.get(*id))
    }

    /// Append a node as a member of `parent` (or as a root module).
    ///
    /// The path is computed from the parent path and the name. A node with an
    /// already indexed path shadows the previous one in the index.
    pub fn push(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.path = match parent {
            Some(parent_id) => format!("{}.{}", self.node(parent_id).path, node.name),
            None => node.name.clone(),
        };
        node.parent = parent;
        self.by_path.insert(node.path.clone(), id);
        self.nodes.push(node);
        match parent {
            Some(parent_id) => self.node_mut(parent_id).members.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Look up a dotted identifier, traversing aliases along the way.
    ///
    /// `package.alias.member` finds `member` in the final target of `alias`.
    /// The last segment is returned as is, so looking up an alias returns the
    /// alias itself.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Collection`] when a segment is missing, and the
    /// alias errors when an intermediate alias cannot be resolved.
    pub fn find(&self, identifier: &str) -> HandlerResult<ObjectRef<'_>> {
        if let Some(found) = self.by_path(identifier) {
            return Ok(found);
        }
        let not_found =
            || HandlerError::collection(identifier, format!("{identifier} could not be found"));
        let mut segments = identifier.split('.');
        let first = segments.next().ok_or_else(not_found)?;
        let mut current = self.root(first).ok_or_else(not_found)?;
        for segment in segments {
            let container = if current.is_alias() {
                current.final_target()?
            } else {
                current
            };
            current = container.member(segment).ok_or_else(not_found)?;
        }
        Ok(current)
    }

    /// Every node, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef<'_>> {
        (0..self.nodes.len()).map(|index| self.get(NodeId(index)))
    }
}

/// Shared read-only interface over any node of the tree.
///
/// Aliases proxy their target for everything except identity: `name`, `path`,
/// `parent`, `lineno` and `inherited` are the alias's own, the rest is read
/// from the final target.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef<'a> {
    tree: &'a ObjectTree,
    id: NodeId,
}

impl PartialEq for ObjectRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a> ObjectRef<'a> {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn tree(&self) -> &'a ObjectTree {
        self.tree
    }

    #[must_use]
    pub fn node(&self) -> &'a Node {
        self.tree.node(self.id)
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    #[must_use]
    pub fn path(&self) -> &'a str {
        &self.node().path
    }

    #[must_use]
    pub fn parent(&self) -> Option<ObjectRef<'a>> {
        self.node().parent.map(|id| self.tree.get(id))
    }

    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.node().is_alias()
    }

    #[must_use]
    pub fn inherited(&self) -> bool {
        self.node().inherited
    }

    #[must_use]
    pub fn lineno(&self) -> Option<u32> {
        self.node().lineno
    }

    /// Line of the import statement, for aliases only.
    #[must_use]
    pub fn alias_lineno(&self) -> Option<u32> {
        if self.is_alias() {
            self.node().lineno
        } else {
            None
        }
    }

    /// Follow the alias chain to the object it finally stands for.
    ///
    /// Returns `self` for regular objects. Targets are looked up by exact path.
    ///
    /// # Errors
    ///
    /// [`HandlerError::AliasResolution`] when a target is missing,
    /// [`HandlerError::CyclicAlias`] when the chain comes back to an alias it
    /// already went through.
    pub fn final_target(&self) -> HandlerResult<ObjectRef<'a>> {
        let mut current = *self;
        let mut chain = vec![self.path().to_string()];
        while let NodeKind::Alias {
            target_path,
        } = &current.node().data
        {
            let next = self.tree.by_path(target_path).ok_or_else(|| {
                HandlerError::AliasResolution {
                    path: current.path().to_string(),
                    target: target_path.clone(),
                }
            })?;
            let next_path = next.path().to_string();
            if chain.contains(&next_path) || next.id == current.id {
                chain.push(next_path);
                return Err(HandlerError::CyclicAlias {
                    path: self.path().to_string(),
                    chain,
                });
            }
            chain.push(next_path);
            current = next;
        }
        Ok(current)
    }

    /// Path of the final target, or the alias target path when it cannot be resolved.
    #[must_use]
    pub fn canonical_path(&self) -> String {
        match self.final_target() {
            Ok(target) => target.path().to_string(),
            Err(_) => self.node().target_path().unwrap_or(self.path()).to_string(),
        }
    }

    /// Kind of the object, resolving aliases.
    ///
    /// # Errors
    ///
    /// Propagates alias resolution errors.
    pub fn kind(&self) -> HandlerResult<Kind> {
        let target = self.final_target()?;
        target.node().data.kind().ok_or_else(|| HandlerError::Other {
            message: format!("{} has no kind", target.path()),
        })
    }

    /// Node holding the data for this object (the final target for aliases).
    fn data_node(&self) -> Option<ObjectRef<'a>> {
        if self.is_alias() {
            self.final_target().ok()
        } else {
            Some(*self)
        }
    }

    /// Members of the object, in insertion order. Aliases expose the
    /// members of their target; unresolvable aliases have none.
    #[must_use]
    pub fn members(&self) -> Vec<ObjectRef<'a>> {
        self.data_node()
            .map(|target| target.node().members.iter().map(|id| self.tree.get(*id)).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<ObjectRef<'a>> {
        self.members().into_iter().find(|member| member.name() == name)
    }

    #[must_use]
    pub fn docstring(&self) -> Option<&'a Docstring> {
        self.data_node().and_then(|target| target.node().docstring.as_ref())
    }

    /// Whether this object has a non-empty docstring.
    #[must_use]
    pub fn has_docstring(&self) -> bool {
        self.docstring().is_some_and(|docstring| !docstring.is_empty())
    }

    /// Whether this object or any of its members has a non-empty docstring.
    ///
    /// Imported members only count when they are public. Each target is
    /// visited once, so alias cycles terminate.
    #[must_use]
    pub fn has_docstrings(&self) -> bool {
        let mut visited = HashSet::new();
        self.has_docstrings_inner(&mut visited)
    }

    fn has_docstrings_inner(&self, visited: &mut HashSet<NodeId>) -> bool {
        let Some(target) = self.data_node() else {
            return false;
        };
        if !visited.insert(target.id) {
            return false;
        }
        if target.has_docstring() {
            return true;
        }
        target.members().iter().any(|member| {
            (!member.is_imported() || member.is_public()) && member.has_docstrings_inner(visited)
        })
    }

    /// Aliases that are not inherited members come from import statements.
    #[must_use]
    pub fn is_imported(&self) -> bool {
        self.is_alias() && !self.inherited()
    }

    /// Whether the object is part of the public API.
    ///
    /// In order: explicit visibility, membership in the parent module's
    /// `__all__`, the private naming convention, then imports (aliases that
    /// are neither inherited nor members of an attribute) are not public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        let node = self.node();
        if let Some(public) = node.public {
            return public;
        }
        let parent = self.parent().and_then(|parent| parent.data_node());
        let exports = parent.and_then(|parent| match &parent.node().data {
            NodeKind::Module {
                exports: Some(exports),
                ..
            } if !exports.is_empty() => Some(exports),
            _ => None,
        });
        if let Some(exports) = exports {
            return exports.iter().any(|export| export == &node.name);
        }
        if node.has_private_name() {
            return false;
        }
        let parent_is_attribute =
            parent.is_some_and(|parent| matches!(parent.node().data, NodeKind::Attribute { .. }));
        if self.is_alias() && !(self.inherited() || parent_is_attribute) {
            return false;
        }
        true
    }

    /// Paths of every structural ancestor, including this object's own path.
    ///
    /// Alias ancestors contribute both their own path and their final
    /// target's path.
    ///
    /// # Errors
    ///
    /// Propagates alias resolution errors of alias ancestors.
    pub fn lineage_paths(&self) -> HandlerResult<HashSet<String>> {
        let mut paths = HashSet::from([self.path().to_string()]);
        let mut ancestor = self.parent();
        while let Some(current) = ancestor {
            paths.insert(current.path().to_string());
            if current.is_alias() {
                paths.insert(current.final_target()?.path().to_string());
            }
            ancestor = current.parent();
        }
        Ok(paths)
    }

    /// Every alias in the tree whose final target is this object.
    #[must_use]
    pub fn aliases(&self) -> Vec<ObjectRef<'a>> {
        let Some(target) = self.data_node() else {
            return Vec::new();
        };
        self.tree
            .iter()
            .filter(|candidate| candidate.is_alias() && candidate.id != self.id)
            .filter(|candidate| candidate.final_target().is_ok_and(|found| found.id == target.id))
            .collect()
    }
}
