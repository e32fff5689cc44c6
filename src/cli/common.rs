//! Arguments shared by the commands that build a handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{HandlerConfig, load_handler_config};
use crate::handler::PythonHandler;
use crate::loader::JsonLoader;

#[derive(Args, Debug, Clone, Default)]
pub struct HandlerArgs {
    /// Configuration file (TOML, JSON, or YAML such as `mkdocs.yml`)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Search path for module dumps, replaces the configured `paths`
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<String>,

    /// Directory of custom templates, replaces the configured one
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl HandlerArgs {
    /// Load the configuration and build a handler reading JSON module dumps.
    pub fn build(&self) -> Result<PythonHandler> {
        let (mut config, base_dir) = match &self.config {
            Some(path) => {
                let config = load_handler_config(path)?;
                let base_dir = path
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                (config, base_dir.to_path_buf())
            }
            None => (HandlerConfig::default(), PathBuf::from(".")),
        };
        let base_dir = std::path::absolute(&base_dir)
            .with_context(|| format!("Failed to resolve directory: {}", base_dir.display()))?;

        if !self.paths.is_empty() {
            config.paths.clone_from(&self.paths);
        }
        if let Some(templates) = &self.templates {
            let templates = std::path::absolute(templates)
                .with_context(|| format!("Failed to resolve directory: {}", templates.display()))?;
            config.custom_templates = Some(templates.display().to_string());
        }
        debug!("Handler configuration: {config:?}");
        Ok(PythonHandler::new(config, &base_dir, Arc::new(JsonLoader)))
    }
}

/// Parse a `KEY=VALUE` option, `VALUE` being JSON or else a plain string.
pub fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) =
        raw.split_once('=').ok_or_else(|| anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("option name is empty in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Local options from parsed `KEY=VALUE` pairs, later pairs winning.
#[must_use]
pub fn options_map(options: &[(String, Value)]) -> Map<String, Value> {
    options.iter().cloned().collect()
}
