//! Loading modules into the object tree.
//!
//! A [`Loader`] knows how to find the data of one top-level module; the
//! provided methods take care of inserting it into a [`ModulesCollection`]
//! and of the alias resolution loop. [`JsonLoader`] reads module dumps from
//! the search paths.

mod collection;
mod json;

pub use collection::ModulesCollection;
pub use json::JsonLoader;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::HandlerResult;
use crate::objects::{NodeId, NodeSpec, ObjectTree};
use crate::options::DocstringStyle;

/// Upper bound on alias resolution rounds.
pub const MAX_RESOLUTION_ITERATIONS: usize = 32;

/// Settings of one loading session.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSettings {
    /// Directories searched in order
    pub search_paths: Vec<PathBuf>,
    /// Parser recorded on every loaded docstring
    pub docstring_parser: Option<DocstringStyle>,
    pub docstring_options: Map<String, Value>,
    /// Loader extensions, with paths already normalized
    pub extensions: Vec<Value>,
    /// Loaders without dynamic analysis ignore both inspection flags
    pub allow_inspection: bool,
    pub force_inspection: bool,
    /// Also look for a `<module>-stubs` package
    pub find_stubs_package: bool,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            docstring_parser: Some(DocstringStyle::Google),
            docstring_options: Map::new(),
            extensions: Vec::new(),
            allow_inspection: true,
            force_inspection: false,
            find_stubs_package: false,
        }
    }
}

/// Outcome of [`Loader::resolve_aliases`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasResolution {
    /// Paths of the aliases still unresolved, sorted
    pub unresolved: Vec<String>,
    pub iterations: usize,
}

/// Source of module data.
pub trait Loader: Send + Sync {
    /// Find and read the top-level module `module`.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Collection`](crate::core::HandlerError::Collection) when
    /// the module cannot be found or read.
    fn read_module(&self, module: &str, settings: &LoadSettings) -> HandlerResult<NodeSpec>;

    /// Load `module` into `collection`, unless it is already there.
    ///
    /// Docstrings of the new module record the configured parser, and
    /// inherited members are (re)attached across every loaded module.
    ///
    /// # Errors
    ///
    /// Same as [`read_module`](Self::read_module).
    fn load(
        &self,
        module: &str,
        collection: &mut ModulesCollection,
        settings: &LoadSettings,
    ) -> HandlerResult<NodeId> {
        if let Some(existing) = collection.tree().root(module) {
            return Ok(existing.id());
        }
        debug!("Loading module {module}");
        let spec = self.read_module(module, settings)?;
        let id = collection.insert(spec);
        collection.tree_mut().apply_docstring_parser(
            id,
            settings.docstring_parser,
            &settings.docstring_options,
        );
        Ok(id)
    }

    /// Load modules targeted by unresolved aliases until every alias
    /// resolves, nothing new can be loaded, or the iteration bound is hit.
    ///
    /// With `external` set to `Some(true)` any module may be loaded,
    /// `Some(false)` never loads anything, and `None` only loads the private
    /// counterpart (`_name`) of an already loaded module.
    fn resolve_aliases(
        &self,
        collection: &mut ModulesCollection,
        settings: &LoadSettings,
        external: Option<bool>,
    ) -> AliasResolution {
        let mut iterations = 0;
        loop {
            iterations += 1;
            let unresolved = unresolved_aliases(collection.tree());
            if unresolved.is_empty() || iterations >= MAX_RESOLUTION_ITERATIONS {
                return AliasResolution {
                    unresolved: unresolved.into_iter().map(|(path, _)| path).collect(),
                    iterations,
                };
            }

            let candidates: BTreeSet<String> = unresolved
                .iter()
                .filter_map(|(_, target)| target.split('.').next())
                .filter(|module| !collection.contains(module))
                .filter(|module| may_load(module, collection, external))
                .map(ToString::to_string)
                .collect();

            let mut loaded_any = false;
            for module in candidates {
                match self.load(&module, collection, settings) {
                    Ok(_) => loaded_any = true,
                    Err(error) => debug!("Could not load {module} to resolve aliases: {error}"),
                }
            }
            if !loaded_any {
                return AliasResolution {
                    unresolved: unresolved.into_iter().map(|(path, _)| path).collect(),
                    iterations,
                };
            }
        }
    }
}

fn may_load(module: &str, collection: &ModulesCollection, external: Option<bool>) -> bool {
    match external {
        Some(allowed) => allowed,
        None => module.strip_prefix('_').is_some_and(|public| collection.contains(public)),
    }
}

/// `(alias path, target path)` of every alias whose chain does not resolve, sorted by path.
fn unresolved_aliases(tree: &ObjectTree) -> Vec<(String, String)> {
    let mut unresolved: Vec<(String, String)> = tree
        .iter()
        .filter(|object| object.is_alias() && object.final_target().is_err())
        .filter_map(|object| {
            let target = object.node().target_path()?;
            Some((object.path().to_string(), target.to_string()))
        })
        .collect();
    unresolved.sort();
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HandlerError;
    use crate::test_utils::fixtures::{alias, function, module};
    use std::collections::HashMap;

    struct StaticLoader {
        modules: HashMap<&'static str, NodeSpec>,
    }

    impl Loader for StaticLoader {
        fn read_module(&self, module: &str, _settings: &LoadSettings) -> HandlerResult<NodeSpec> {
            self.modules.get(module).cloned().ok_or_else(|| {
                HandlerError::collection(module, format!("No module named '{module}'"))
            })
        }
    }

    fn loader() -> StaticLoader {
        StaticLoader {
            modules: HashMap::from([
                ("app", module("app").with_member(alias("helper", "lib.helper"))),
                ("lib", module("lib").with_member(alias("helper", "_lib.helper"))),
                ("_lib", module("_lib").with_member(function("helper").with_docstring("Help."))),
            ]),
        }
    }

    #[test]
    fn test_load_records_docstring_parser() {
        let mut collection = ModulesCollection::new();
        let settings = LoadSettings {
            docstring_parser: Some(DocstringStyle::Numpy),
            ..LoadSettings::default()
        };
        loader().load("_lib", &mut collection, &settings).unwrap();
        let docstring = collection.get("_lib.helper").unwrap().docstring().unwrap();
        assert_eq!(docstring.parser, Some(DocstringStyle::Numpy));
    }

    #[test]
    fn test_load_missing_module() {
        let mut collection = ModulesCollection::new();
        let error = loader().load("ghost", &mut collection, &LoadSettings::default()).unwrap_err();
        assert_eq!(error.to_string(), "Could not collect 'ghost': No module named 'ghost'");
    }

    #[test]
    fn test_resolution_without_external_modules() {
        let mut collection = ModulesCollection::new();
        let loader = loader();
        loader.load("app", &mut collection, &LoadSettings::default()).unwrap();
        let outcome =
            loader.resolve_aliases(&mut collection, &LoadSettings::default(), Some(false));
        assert_eq!(outcome.unresolved, vec!["app.helper"]);
        assert!(!collection.contains("lib"));
    }

    #[test]
    fn test_resolution_with_external_modules() {
        let mut collection = ModulesCollection::new();
        let loader = loader();
        loader.load("app", &mut collection, &LoadSettings::default()).unwrap();
        let outcome = loader.resolve_aliases(&mut collection, &LoadSettings::default(), Some(true));
        assert!(outcome.unresolved.is_empty());
        assert_eq!(outcome.iterations, 3);
        assert!(collection.get("app.helper").unwrap().final_target().is_ok());
    }

    #[test]
    fn test_default_resolution_loads_private_counterpart_only() {
        let mut collection = ModulesCollection::new();
        let loader = loader();
        loader.load("lib", &mut collection, &LoadSettings::default()).unwrap();
        let outcome = loader.resolve_aliases(&mut collection, &LoadSettings::default(), None);
        assert!(outcome.unresolved.is_empty());
        assert!(collection.contains("_lib"));
    }
}
