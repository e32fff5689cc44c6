//! Cache of loaded modules.

use std::sync::Arc;

use tracing::debug;

use crate::core::HandlerResult;
use crate::objects::{NodeId, NodeSpec, ObjectRef, ObjectTree};

/// All modules loaded by a handler, keyed by top-level module name.
///
/// A module is written once and kept until [`reset`](Self::reset). The tree
/// is shared with renderers through [`snapshot`](Self::snapshot); mutating
/// the collection while a snapshot is alive copies the tree first.
#[derive(Debug, Clone, Default)]
pub struct ModulesCollection {
    tree: Arc<ObjectTree>,
}

impl ModulesCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the top-level module `name` is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tree.root(name).is_some()
    }

    #[must_use]
    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    /// Shared handle on the current tree.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ObjectTree> {
        Arc::clone(&self.tree)
    }

    pub(crate) fn tree_mut(&mut self) -> &mut ObjectTree {
        Arc::make_mut(&mut self.tree)
    }

    /// Add a top-level module. An already loaded module is kept as is.
    pub fn insert(&mut self, spec: NodeSpec) -> NodeId {
        if let Some(existing) = self.tree.root(&spec.name) {
            debug!("Module {} is already loaded", spec.name);
            return existing.id();
        }
        let tree = self.tree_mut();
        let id = tree.insert_spec(None, spec);
        let roots: Vec<NodeId> = tree
            .root_names()
            .filter_map(|name| tree.root(name))
            .map(|root| root.id())
            .collect();
        for root in roots {
            tree.attach_inherited_members(root);
        }
        id
    }

    /// Look up an object by dotted identifier.
    ///
    /// # Errors
    ///
    /// See [`ObjectTree::find`].
    pub fn get(&self, identifier: &str) -> HandlerResult<ObjectRef<'_>> {
        self.tree.find(identifier)
    }

    /// Names of the loaded top-level modules.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.tree.root_names()
    }

    /// Forget every loaded module.
    pub fn reset(&mut self) {
        self.tree = Arc::new(ObjectTree::new());
    }
}
