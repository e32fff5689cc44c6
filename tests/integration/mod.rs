//! Integration tests for pydocs-handler.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **pipeline**: collect and render through [`PythonHandler`] with module dumps on disk
//! - **config_files**: handler configuration from TOML, JSON and `mkdocs.yml`
//! - **cli**: the `pydocs` binary

mod common;

mod cli;
mod config_files;
mod pipeline;
