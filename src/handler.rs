//! The Python handler: collects objects and renders them.
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use pydocs_handler::config::HandlerConfig;
//! use pydocs_handler::handler::PythonHandler;
//! use pydocs_handler::loader::JsonLoader;
//!
//! # fn main() -> pydocs_handler::core::HandlerResult<()> {
//! let config = HandlerConfig::default();
//! let mut handler = PythonHandler::new(config, Path::new("."), Arc::new(JsonLoader));
//! let options = handler.get_options(&serde_json::Map::new())?;
//! let item = handler.collect("package.module", Some(&options))?;
//! let html = handler.render(&item, &options, None)?;
//! # Ok(())
//! # }
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{HandlerConfig, resolve_search_paths};
use crate::core::{HandlerError, HandlerResult};
use crate::formatter::Formatter;
use crate::inventory;
use crate::loader::{LoadSettings, Loader, ModulesCollection};
use crate::objects::{ObjectRef, ObjectTree};
use crate::options::{ResolvedOptions, extract_unknown, merge_options};
use crate::templating::Renderer;

/// Environment variable holding the default module search path.
pub const SEARCH_PATH_ENV: &str = "PYDOCS_PATH";

/// An object returned by [`PythonHandler::collect`].
///
/// Holds a snapshot of the collection, so later collects do not affect it.
#[derive(Debug, Clone)]
pub struct CollectedItem {
    tree: Arc<ObjectTree>,
    path: String,
}

impl CollectedItem {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The collected object.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Collection`] if the path no longer resolves, which only
    /// happens for items built by hand.
    pub fn object(&self) -> HandlerResult<ObjectRef<'_>> {
        self.tree.find(&self.path)
    }

    pub fn tree(&self) -> &Arc<ObjectTree> {
        &self.tree
    }
}

/// Search paths from [`SEARCH_PATH_ENV`].
#[must_use]
pub fn default_search_paths() -> Vec<PathBuf> {
    std::env::var_os(SEARCH_PATH_ENV)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default()
}

pub struct PythonHandler {
    config: HandlerConfig,
    base_dir: PathBuf,
    search_paths: Vec<PathBuf>,
    /// Known options from the global configuration
    global_options: Map<String, Value>,
    /// Unknown keys found directly under the global `options`
    global_extra: Map<String, Value>,
    loader: Arc<dyn Loader>,
    collection: ModulesCollection,
    renderer: Renderer,
}

impl std::fmt::Debug for PythonHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonHandler")
            .field("base_dir", &self.base_dir)
            .field("search_paths", &self.search_paths)
            .field("modules", &self.collection.module_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl PythonHandler {
    /// Handler for a site whose configuration file lives in `base_dir`.
    ///
    /// Search paths default to [`default_search_paths`].
    pub fn new(config: HandlerConfig, base_dir: &Path, loader: Arc<dyn Loader>) -> Self {
        Self::with_search_defaults(config, base_dir, loader, default_search_paths())
    }

    /// Like [`new`](Self::new), with explicit default search paths.
    pub fn with_search_defaults(
        config: HandlerConfig,
        base_dir: &Path,
        loader: Arc<dyn Loader>,
        defaults: Vec<PathBuf>,
    ) -> Self {
        let (global_options, global_extra) = extract_unknown(&config.options);
        if !global_extra.is_empty() {
            let keys: Vec<&str> = global_extra.keys().map(String::as_str).collect();
            warn!(
                "Passing extra options directly under `options` is deprecated, pass them under `options.extra` instead: {}",
                keys.join(", ")
            );
        }

        let search_paths = resolve_search_paths(&config.paths, base_dir, defaults);
        debug!("Module search paths: {search_paths:?}");
        let custom_templates = config.custom_templates.as_ref().map(|dir| base_dir.join(dir));

        Self {
            base_dir: base_dir.to_path_buf(),
            search_paths,
            global_options,
            global_extra,
            loader,
            collection: ModulesCollection::new(),
            renderer: Renderer::with_default_formatter(custom_templates),
            config,
        }
    }

    /// Replace the formatter used for signatures.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        let custom_templates =
            self.config.custom_templates.as_ref().map(|dir| self.base_dir.join(dir));
        self.renderer = Renderer::new(custom_templates, formatter);
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn collection(&self) -> &ModulesCollection {
        &self.collection
    }

    /// Global options overlaid with `local` ones.
    ///
    /// Legacy unknown global options are kept in
    /// [`ResolvedOptions::unknown`], under the local ones.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Config`] naming the offending option.
    pub fn get_options(&self, local: &Map<String, Value>) -> HandlerResult<ResolvedOptions> {
        let mut options = merge_options(&self.global_options, local)?;
        for (key, value) in &self.global_extra {
            if !options.unknown.contains_key(key) {
                options.unknown.insert(key.clone(), value.clone());
            }
        }
        Ok(options)
    }

    fn load_settings(&self, options: &ResolvedOptions) -> LoadSettings {
        LoadSettings {
            search_paths: self.search_paths.clone(),
            docstring_parser: options.docstring_style,
            docstring_options: options.docstring_parser_options(),
            extensions: self.normalize_extension_paths(&options.extensions),
            allow_inspection: options.allow_inspection,
            force_inspection: options.force_inspection,
            find_stubs_package: options.find_stubs_package,
        }
    }

    /// Collect the object at `identifier`, loading its module if needed.
    ///
    /// Without options (fallback mode, used when resolving cross-references
    /// from other pages), no module is loaded and docstring parser settings
    /// are left as they are.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Collection`] when the module cannot be loaded or the
    /// object cannot be found.
    pub fn collect(
        &mut self,
        identifier: &str,
        options: Option<&ResolvedOptions>,
    ) -> HandlerResult<CollectedItem> {
        let module_name = identifier.split('.').next().unwrap_or(identifier);
        let unknown_module = !self.collection.contains(module_name);

        let (options, reapply) = match options {
            Some(options) => (options.clone(), true),
            None if unknown_module => {
                return Err(HandlerError::collection(
                    identifier,
                    "Not loading additional modules during fallback",
                ));
            }
            None => (self.get_options(&Map::new())?, false),
        };
        let settings = self.load_settings(&options);

        if unknown_module {
            for module in &options.preload_modules {
                if !self.collection.contains(module) {
                    self.loader.load(module, &mut self.collection, &settings)?;
                }
            }
            self.loader.load(module_name, &mut self.collection, &settings)?;

            let resolution = self.loader.resolve_aliases(
                &mut self.collection,
                &settings,
                self.config.load_external_modules,
            );
            if resolution.unresolved.is_empty() {
                debug!("All aliases were resolved after {} iterations", resolution.iterations);
            } else {
                debug!(
                    "{} aliases were still unresolved after {} iterations",
                    resolution.unresolved.len(),
                    resolution.iterations
                );
            }
        }

        let object = self.collection.get(identifier).map_err(|error| match error {
            HandlerError::Collection { .. } => error,
            other => HandlerError::collection(identifier, other.to_string()),
        })?;
        let path = object.path().to_string();
        let target = object.final_target().ok().map(|target| target.id());

        if !unknown_module && reapply {
            if let Some(target) = target {
                self.collection.tree_mut().set_docstring_parser(
                    target,
                    settings.docstring_parser,
                    &settings.docstring_options,
                );
            }
        }

        Ok(CollectedItem {
            tree: self.collection.snapshot(),
            path,
        })
    }

    /// Render a collected item.
    ///
    /// The locale defaults to the configured one, then to English.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Template`] when a template fails.
    pub fn render(
        &self,
        item: &CollectedItem,
        options: &ResolvedOptions,
        locale: Option<&str>,
    ) -> HandlerResult<String> {
        let locale = locale.or(self.config.locale.as_deref());
        self.renderer.render(Arc::clone(&item.tree), &item.path, options, locale)
    }

    /// Configured inventories, with the arguments to load each of them.
    #[must_use]
    pub fn get_inventory_urls(&self) -> Vec<(String, Map<String, Value>)> {
        self.config
            .inventories
            .iter()
            .map(|inventory| (inventory.url.clone(), inventory.load_arguments()))
            .collect()
    }

    /// Identifiers and URLs of the items of a Sphinx inventory.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Inventory`] for malformed inventories.
    pub fn load_inventory<R: Read>(
        reader: R,
        url: &str,
        base_url: Option<&str>,
        domains: Option<&[String]>,
    ) -> HandlerResult<Vec<(String, String)>> {
        inventory::load_inventory(reader, url, base_url, domains)
    }

    /// Every path under which the object at `identifier` can be referenced.
    ///
    /// A `(parameter)` suffix is carried over to each alias. Unknown or
    /// unresolvable identifiers have no aliases.
    #[must_use]
    pub fn get_aliases(&self, identifier: &str) -> Vec<String> {
        let (identifier, parameter) = match identifier.split_once('(') {
            Some((identifier, parameter)) => {
                (identifier, Some(parameter.strip_suffix(')').unwrap_or(parameter)))
            }
            None => (identifier, None),
        };
        let Ok(object) = self.collection.get(identifier) else {
            return Vec::new();
        };

        let mut aliases = vec![object.path().to_string()];
        if object.final_target().is_ok() {
            let others = std::iter::once(object.canonical_path())
                .chain(object.aliases().into_iter().map(|alias| alias.path().to_string()));
            for alias in others {
                if !aliases.contains(&alias) {
                    aliases.push(alias);
                }
            }
        }

        match parameter {
            Some(parameter) => {
                aliases.into_iter().map(|alias| format!("{alias}({parameter})")).collect()
            }
            None => aliases,
        }
    }

    /// Make extension paths absolute, relative to the configuration directory.
    ///
    /// An extension is a name or a single-entry `{name: options}` mapping.
    /// Names that look like file paths (`.py` files, `file.py:Class`, or
    /// containing a separator) are joined to the base directory.
    #[must_use]
    pub fn normalize_extension_paths(&self, extensions: &[Value]) -> Vec<Value> {
        extensions
            .iter()
            .map(|extension| match extension {
                Value::Object(map) if map.len() == 1 => {
                    let mut normalized = Map::new();
                    for (name, options) in map {
                        normalized.insert(self.normalize_extension_path(name), options.clone());
                    }
                    Value::Object(normalized)
                }
                Value::String(name) => Value::String(self.normalize_extension_path(name)),
                other => other.clone(),
            })
            .collect()
    }

    fn normalize_extension_path(&self, name: &str) -> String {
        let is_path = name.ends_with(".py")
            || name.contains(".py:")
            || name.contains('/')
            || name.contains('\\');
        if !is_path {
            return name.to_string();
        }
        crate::config::normalize_path(&self.base_dir.join(name)).display().to_string()
    }

    /// Forget every loaded module.
    pub fn reset(&mut self) {
        self.collection.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::IdentityFormatter;
    use crate::objects::NodeSpec;
    use crate::options::DocstringStyle;
    use crate::test_utils::fixtures::{alias, function, module};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StaticLoader {
        modules: HashMap<&'static str, NodeSpec>,
        reads: Mutex<Vec<String>>,
    }

    impl StaticLoader {
        fn with(mut self, name: &'static str, spec: NodeSpec) -> Self {
            self.modules.insert(name, spec);
            self
        }
    }

    impl Loader for StaticLoader {
        fn read_module(&self, module: &str, _settings: &LoadSettings) -> HandlerResult<NodeSpec> {
            self.reads.lock().unwrap().push(module.to_string());
            self.modules
                .get(module)
                .cloned()
                .ok_or_else(|| {
                    HandlerError::collection(module, format!("No module named '{module}'"))
                })
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn handler(config: HandlerConfig, loader: Arc<StaticLoader>) -> PythonHandler {
        PythonHandler::with_search_defaults(config, Path::new("/site"), loader, Vec::new())
            .with_formatter(Arc::new(IdentityFormatter))
    }

    fn loader() -> Arc<StaticLoader> {
        Arc::new(
            StaticLoader::default()
                .with(
                    "app",
                    module("app")
                        .with_docstring("App.")
                        .with_member(function("run").with_docstring("Run."))
                        .with_member(alias("helper", "lib.helper")),
                )
                .with("lib", module("lib").with_member(function("helper").with_docstring("Help."))),
        )
    }

    #[test]
    fn test_legacy_global_options_are_kept_aside() {
        let config = HandlerConfig {
            options: map(json!({"show_source": false, "my_flag": true})),
            ..HandlerConfig::default()
        };
        let handler = handler(config, loader());
        let options = handler.get_options(&map(json!({"show_bases": false}))).unwrap();
        assert!(!options.show_source);
        assert!(!options.show_bases);
        assert_eq!(options.unknown.get("my_flag"), Some(&json!(true)));

        let local = handler.get_options(&map(json!({"my_flag": false}))).unwrap();
        assert_eq!(local.unknown.get("my_flag"), Some(&json!(false)));
    }

    #[test]
    fn test_collect_loads_module_once() {
        let loader = loader();
        let mut handler = handler(HandlerConfig::default(), Arc::clone(&loader));
        let options = handler.get_options(&Map::new()).unwrap();
        let item = handler.collect("app.run", Some(&options)).unwrap();
        assert_eq!(item.path(), "app.run");
        handler.collect("app", Some(&options)).unwrap();
        assert_eq!(*loader.reads.lock().unwrap(), vec!["app".to_string()]);
    }

    #[test]
    fn test_collect_missing_object() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let options = handler.get_options(&Map::new()).unwrap();
        let error = handler.collect("app.nothing", Some(&options)).unwrap_err();
        let expected = HandlerError::collection("app.nothing", "app.nothing could not be found");
        assert_eq!(error.to_string(), expected.to_string());
    }

    #[test]
    fn test_collect_missing_module() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let options = handler.get_options(&Map::new()).unwrap();
        let error = handler.collect("ghost.thing", Some(&options)).unwrap_err();
        assert!(matches!(error, HandlerError::Collection { .. }));
    }

    #[test]
    fn test_fallback_never_loads() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let error = handler.collect("app.run", None).unwrap_err();
        assert!(error.to_string().contains("Not loading additional modules during fallback"));

        let options = handler.get_options(&Map::new()).unwrap();
        handler.collect("app", Some(&options)).unwrap();
        assert_eq!(handler.collect("app.run", None).unwrap().path(), "app.run");
    }

    #[test]
    fn test_docstring_parser_reapplied_on_later_collect() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let google = handler.get_options(&Map::new()).unwrap();
        handler.collect("app", Some(&google)).unwrap();

        let numpy = handler.get_options(&map(json!({"docstring_style": "numpy"}))).unwrap();
        let item = handler.collect("app.run", Some(&numpy)).unwrap();
        let docstring = item.object().unwrap().docstring().unwrap().clone();
        assert_eq!(docstring.parser, Some(DocstringStyle::Numpy));

        let fallback = handler.collect("app.run", None).unwrap();
        let parser = fallback.object().unwrap().docstring().unwrap().parser;
        assert_eq!(parser, Some(DocstringStyle::Numpy));
        let module = handler.collect("app", None).unwrap();
        let parser = module.object().unwrap().docstring().unwrap().parser;
        assert_eq!(parser, Some(DocstringStyle::Google));
    }

    #[test]
    fn test_external_modules_follow_configuration() {
        let config = HandlerConfig {
            load_external_modules: Some(true),
            ..HandlerConfig::default()
        };
        let mut handler = handler(config, loader());
        let options = handler.get_options(&Map::new()).unwrap();
        let item = handler.collect("app.helper", Some(&options)).unwrap();
        assert_eq!(item.object().unwrap().final_target().unwrap().path(), "lib.helper");
        assert_eq!(
            handler.get_aliases("lib.helper(x)"),
            vec!["lib.helper(x)".to_string(), "app.helper(x)".to_string()]
        );
    }

    #[test]
    fn test_get_aliases_of_unknown_identifier() {
        let handler = handler(HandlerConfig::default(), loader());
        assert!(handler.get_aliases("app.run").is_empty());
    }

    #[test]
    fn test_render_collected_item() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let options = handler.get_options(&map(json!({"show_root_heading": true}))).unwrap();
        let item = handler.collect("app", Some(&options)).unwrap();
        let html = handler.render(&item, &options, None).unwrap();
        assert!(html.contains(r#"id="app""#));
        assert!(html.contains(r#"id="app.run""#));
    }

    #[test]
    fn test_inventory_urls() {
        let raw = map(json!({"inventories": ["https://a.org/objects.inv"]}));
        let config = HandlerConfig::from_map(raw).unwrap();
        let handler = handler(config, loader());
        let urls = handler.get_inventory_urls();
        assert_eq!(urls[0].0, "https://a.org/objects.inv");
        assert_eq!(urls[0].1.get("domains"), Some(&json!(["py"])));
    }

    #[test]
    fn test_normalize_extension_paths() {
        let handler = handler(HandlerConfig::default(), loader());
        let normalized = handler.normalize_extension_paths(&[
            json!("griffe_typingdoc"),
            json!("ext/local.py"),
            json!({"../shared/ext.py:Extension": {"flag": true}}),
        ]);
        assert_eq!(
            normalized,
            vec![
                json!("griffe_typingdoc"),
                json!("/site/ext/local.py"),
                json!({"/shared/ext.py:Extension": {"flag": true}}),
            ]
        );
    }

    #[test]
    fn test_reset_forgets_modules() {
        let mut handler = handler(HandlerConfig::default(), loader());
        let options = handler.get_options(&Map::new()).unwrap();
        handler.collect("app", Some(&options)).unwrap();
        handler.reset();
        assert!(handler.collect("app", None).is_err());
    }
}
