//! Loader reading module dumps from disk.

use std::path::PathBuf;

use tracing::debug;

use super::{LoadSettings, Loader};
use crate::core::{HandlerError, HandlerResult};
use crate::objects::NodeSpec;

/// Reads `<module>.json` dumps (see [`NodeSpec`]) from the search paths.
///
/// The first search path holding the dump wins. With `find_stubs_package`,
/// `<module>-stubs.json` is used when no regular dump exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn locate(module: &str, settings: &LoadSettings) -> Option<PathBuf> {
        let mut candidates = vec![format!("{module}.json")];
        if settings.find_stubs_package {
            candidates.push(format!("{module}-stubs.json"));
        }
        candidates.iter().find_map(|file_name| {
            settings.search_paths.iter().map(|dir| dir.join(file_name)).find(|path| path.is_file())
        })
    }
}

impl Loader for JsonLoader {
    fn read_module(&self, module: &str, settings: &LoadSettings) -> HandlerResult<NodeSpec> {
        if !settings.extensions.is_empty() {
            debug!(
                "Module dumps are already processed, ignoring {} extensions",
                settings.extensions.len()
            );
        }
        let path = Self::locate(module, settings).ok_or_else(|| {
            HandlerError::collection(module, format!("No module named '{module}'"))
        })?;
        debug!("Reading {module} from {}", path.display());

        let content = std::fs::read_to_string(&path).map_err(|error| HandlerError::Io {
            operation: "reading module dump".to_string(),
            path: path.display().to_string(),
            message: error.to_string(),
        })?;
        let mut spec: NodeSpec = serde_json::from_str(&content).map_err(|error| {
            let reason = format!("Invalid module dump {}: {error}", path.display());
            HandlerError::collection(module, reason)
        })?;
        if spec.name != module {
            debug!("Dump {} names its module {}, using {module}", path.display(), spec.name);
            spec.name = module.to_string();
        }
        Ok(spec)
    }
}
