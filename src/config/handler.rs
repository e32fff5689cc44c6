//! Handler configuration record and search path resolution.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{HandlerError, HandlerResult};

/// An inventory to download, for cross-references to external projects.
///
/// Accepts a bare URL string or a mapping with `url`, `base_url` and `domains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InventorySpec")]
pub struct Inventory {
    pub url: String,
    /// Base URL of the inventory items, defaults to the URL's directory
    pub base_url: Option<String>,
    /// Domains kept when loading the inventory
    pub domains: Vec<String>,
}

fn default_domains() -> Vec<String> {
    vec!["py".to_string()]
}

impl Inventory {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            base_url: None,
            domains: default_domains(),
        }
    }

    /// Keyword arguments handed back with the URL by
    /// [`PythonHandler::get_inventory_urls`](crate::handler::PythonHandler::get_inventory_urls).
    #[must_use]
    pub fn load_arguments(&self) -> Map<String, Value> {
        let mut arguments = Map::new();
        arguments.insert(
            "base_url".into(),
            self.base_url.clone().map_or(Value::Null, Value::String),
        );
        arguments.insert(
            "domains".into(),
            Value::Array(self.domains.iter().cloned().map(Value::String).collect()),
        );
        arguments
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InventorySpec {
    Url(String),
    Full {
        url: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_domains")]
        domains: Vec<String>,
    },
}

impl From<InventorySpec> for Inventory {
    fn from(spec: InventorySpec) -> Self {
        match spec {
            InventorySpec::Url(url) => Self::new(url),
            InventorySpec::Full {
                url,
                base_url,
                domains,
            } => Self {
                url,
                base_url,
                domains,
            },
        }
    }
}

/// Configuration of the Python handler, as found under
/// `plugins.mkdocstrings.handlers.python` in `mkdocs.yml` or in a standalone file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    /// Inventories to download for external cross-references
    pub inventories: Vec<Inventory>,
    /// Search paths, glob patterns relative to the configuration directory
    pub paths: Vec<String>,
    /// Whether to load modules outside the search paths to resolve aliases
    pub load_external_modules: Option<bool>,
    /// Global options, validated lazily on each `get_options` call
    pub options: Map<String, Value>,
    /// Default locale of rendered text
    pub locale: Option<String>,
    /// Directory of templates overriding the bundled ones
    pub custom_templates: Option<String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            inventories: Vec::new(),
            paths: vec![".".to_string()],
            load_external_modules: None,
            options: Map::new(),
            locale: None,
            custom_templates: None,
        }
    }
}

impl HandlerConfig {
    /// Build the configuration from a raw mapping.
    ///
    /// The legacy `import` key is renamed `inventories` when the latter is absent.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Config`] when the mapping does not have the expected shape.
    pub fn from_map(mut raw: Map<String, Value>) -> HandlerResult<Self> {
        if !raw.contains_key("inventories") {
            if let Some(legacy) = raw.remove("import") {
                warn!("The 'import' key is renamed 'inventories' for the Python handler");
                raw.insert("inventories".to_string(), legacy);
            }
        }
        serde_json::from_value(Value::Object(raw))
            .map_err(|error| HandlerError::config("handler", error.to_string()))
    }
}

/// Resolve configured search paths against `base_dir`.
///
/// Each entry is glob-expanded relative to `base_dir`. When nothing matches,
/// `base_dir` itself is used. Matches are made absolute, removed from
/// `defaults` if already listed, and put in front so the first configured
/// path ends up first.
#[must_use]
pub fn resolve_search_paths(
    paths: &[String],
    base_dir: &Path,
    defaults: Vec<PathBuf>,
) -> Vec<PathBuf> {
    let mut matched: Vec<PathBuf> =
        paths.iter().flat_map(|pattern| expand(pattern, base_dir)).collect();
    if matched.is_empty() {
        matched.push(base_dir.to_path_buf());
    }

    let mut search_paths: Vec<PathBuf> =
        defaults.into_iter().filter(|path| !path.as_os_str().is_empty()).collect();
    for path in matched.into_iter().rev() {
        let path = normalize_path(&base_dir.join(path));
        search_paths.retain(|known| known != &path);
        search_paths.insert(0, path);
    }
    debug!("Search paths: {search_paths:?}");
    search_paths
}

fn expand(pattern: &str, base_dir: &Path) -> Vec<PathBuf> {
    let full_pattern = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        format!("{}/{pattern}", glob::Pattern::escape(&base_dir.to_string_lossy()))
    };
    match glob::glob(&full_pattern) {
        Ok(entries) => entries.filter_map(Result::ok).collect(),
        Err(error) => {
            warn!("Invalid search path pattern '{pattern}': {error}");
            Vec::new()
        }
    }
}

/// Absolute, lexically normalized form of `path`.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::from_map(Map::new()).unwrap();
        assert_eq!(config.paths, vec!["."]);
        assert!(config.inventories.is_empty());
        assert_eq!(config.load_external_modules, None);
        assert_eq!(config.locale, None);
    }

    #[test]
    fn test_inventory_shapes() {
        let config = HandlerConfig::from_map(map(json!({
            "inventories": [
                "https://docs.python.org/3/objects.inv",
                {
                    "url": "https://example.org/objects.inv",
                    "base_url": "https://example.org/api",
                    "domains": ["std"]
                }
            ]
        })))
        .unwrap();
        assert_eq!(config.inventories[0], Inventory::new("https://docs.python.org/3/objects.inv"));
        assert_eq!(config.inventories[0].domains, vec!["py"]);
        assert_eq!(config.inventories[1].base_url.as_deref(), Some("https://example.org/api"));
        assert_eq!(config.inventories[1].domains, vec!["std"]);
    }

    #[test]
    fn test_legacy_import_key() {
        let config =
            HandlerConfig::from_map(map(json!({"import": ["https://a.org/objects.inv"]}))).unwrap();
        assert_eq!(config.inventories.len(), 1);

        let config = HandlerConfig::from_map(map(json!({
            "import": ["https://a.org/objects.inv"],
            "inventories": []
        })));
        assert!(config.is_err(), "import is not a known key once inventories is given");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let error = HandlerConfig::from_map(map(json!({"pathz": ["src"]}))).unwrap_err();
        assert!(matches!(error, HandlerError::Config { .. }));
    }

    #[test]
    fn test_search_paths_precedence() {
        let temp = tempdir().unwrap();
        let base = temp.path();
        std::fs::create_dir_all(base.join("src")).unwrap();
        std::fs::create_dir_all(base.join("lib")).unwrap();

        let defaults = vec![
            PathBuf::from("/usr/lib/python"),
            normalize_path(&base.join("lib")),
            PathBuf::new(),
        ];
        let resolved =
            resolve_search_paths(&["src".to_string(), "lib".to_string()], base, defaults);
        assert_eq!(
            resolved,
            vec![
                normalize_path(&base.join("src")),
                normalize_path(&base.join("lib")),
                PathBuf::from("/usr/lib/python"),
            ]
        );
    }

    #[test]
    fn test_search_paths_default_to_base_dir() {
        let temp = tempdir().unwrap();
        let resolved = resolve_search_paths(&["missing*".to_string()], temp.path(), Vec::new());
        assert_eq!(resolved, vec![normalize_path(temp.path())]);
    }

    #[test]
    fn test_search_paths_expand_globs() {
        let temp = tempdir().unwrap();
        for name in ["pkg_a", "pkg_b", "other"] {
            std::fs::create_dir_all(temp.path().join("packages").join(name)).unwrap();
        }
        let resolved =
            resolve_search_paths(&["packages/pkg_*".to_string()], temp.path(), Vec::new());
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|path| path.is_absolute()));
    }
}
