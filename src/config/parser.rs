//! Configuration file parsing.
//!
//! The handler configuration can live in three kinds of files, selected by
//! extension:
//!
//! - `.toml`: the handler keys at the top level
//! - `.json`: the handler keys at the top level
//! - `.yml` / `.yaml`: either the handler keys at the top level, or a full
//!   `mkdocs.yml` where the handler section is found under
//!   `plugins: [mkdocstrings: {handlers: {python: ...}}]`
//!
//! # Examples
//!
//! ```rust,no_run
//! use pydocs_handler::config::load_handler_config;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = load_handler_config(Path::new("mkdocs.yml"))?;
//! println!("{} inventories", config.inventories.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Messages
//!
//! Two levels of context are attached to failures:
//!
//! 1. **File Operation Context**: "Failed to read config file: /path/to/file"
//! 2. **Parsing Context**: "Failed to parse config file: /path/to/file"

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use super::handler::HandlerConfig;

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Format of `path`, from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a configuration file into any deserializable type.
///
/// # Errors
///
/// Fails when the file cannot be read, has an unsupported extension, or does
/// not parse into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let Some(format) = ConfigFormat::from_path(path) else {
        bail!("Unsupported config file extension: {}", path.display());
    };

    let config: T = match format {
        ConfigFormat::Toml => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        ConfigFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
    };

    Ok(config)
}

/// Load the handler configuration from `path`.
///
/// For YAML files with a `plugins` list the Python handler section of the
/// mkdocstrings plugin is extracted; a site configuration without that section
/// yields the default configuration.
///
/// # Errors
///
/// Fails when the file cannot be parsed or the handler section is malformed.
pub fn load_handler_config(path: &Path) -> Result<HandlerConfig> {
    let raw = match ConfigFormat::from_path(path) {
        Some(ConfigFormat::Yaml) => {
            let document: serde_yaml::Value = parse_config(path)?;
            handler_section(&document)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        _ => parse_config(path)?,
    };
    let config = HandlerConfig::from_map(raw)
        .with_context(|| format!("Invalid handler configuration in {}", path.display()))?;
    tracing::debug!("Loaded handler configuration from {}", path.display());
    Ok(config)
}

fn handler_section(document: &serde_yaml::Value) -> Result<Map<String, Value>> {
    let Some(plugins) = document.get("plugins") else {
        return Ok(serde_json::from_value(serde_json::to_value(document)?)?);
    };
    let plugin = match plugins {
        serde_yaml::Value::Sequence(entries) => {
            entries.iter().find_map(|entry| entry.get("mkdocstrings"))
        }
        serde_yaml::Value::Mapping(_) => plugins.get("mkdocstrings"),
        _ => None,
    };
    let section = plugin
        .and_then(|plugin| plugin.get("handlers"))
        .and_then(|handlers| handlers.get("python"));
    match section {
        Some(section) if !section.is_null() => {
            Ok(serde_json::from_value(serde_json::to_value(section)?)?)
        }
        _ => Ok(Map::new()),
    }
}
