//! Test utilities.
//!
//! - [`fixtures`]: constructors for object trees
//! - [`DumpDir`]: a temporary site with module dumps and a configuration file
//! - [`init_test_logging`]: tracing output in tests
//!
//! ```rust,no_run
//! use pydocs_handler::test_utils::{DumpDir, fixtures};
//!
//! let site = DumpDir::new().unwrap();
//! site.write_module(&fixtures::module("pkg").with_docstring("Docs.")).unwrap();
//! site.write_config("handler.toml", "paths = [\"dumps\"]").unwrap();
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::objects::NodeSpec;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once.
///
/// Uses `level` when given, otherwise `RUST_LOG`; without either, logging
/// stays off.
///
/// ```bash
/// RUST_LOG=pydocs_handler=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// A temporary site directory.
///
/// Module dumps are written to `dumps/`, configuration files and templates
/// at the root.
pub struct DumpDir {
    dir: TempDir,
}

impl DumpDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        std::fs::create_dir_all(dir.path().join("dumps"))
            .context("Failed to create dumps directory")?;
        Ok(Self {
            dir,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn dumps(&self) -> PathBuf {
        self.dir.path().join("dumps")
    }

    /// Write `spec` as `dumps/<name>.json`.
    pub fn write_module(&self, spec: &NodeSpec) -> Result<PathBuf> {
        let path = self.dumps().join(format!("{}.json", spec.name));
        let content = serde_json::to_string_pretty(spec)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write a file relative to the site root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn write_config(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.write_file(name, content)
    }
}
