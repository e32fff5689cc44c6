//! Command-line interface of `pydocs`.
//!
//! | Command | Purpose |
//! |---|---|
//! | `render <identifier>` | Collect an object from module dumps and print its HTML |
//! | `schema` | Print the JSON schema of the handler options |
//! | `inventory <url>` | List the items of a Sphinx inventory with their URLs |
//! | `aliases <identifier>` | List every path an object can be referenced by |
//!
//! Global flags `--verbose` and `--quiet` control logging; without either,
//! `RUST_LOG` is honored and defaults to `info`.

mod aliases;
pub mod common;
mod inventory;
mod render;
mod schema;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Settings shared by every command, derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter, `None` to disable logging
    pub log_level: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a stderr subscriber for the configured level.
    ///
    /// Does nothing when logging is disabled or a subscriber is already set.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) if level == "info" => EnvFilter::from_default_env(),
            _ => EnvFilter::new(level),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "pydocs",
    about = "Render documentation for Python objects",
    version,
    long_about = "pydocs collects Python objects from module dumps and renders them to HTML, \
                  with the options of the mkdocstrings Python handler."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Show no logs at all
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an object to HTML
    Render(render::RenderCommand),

    /// Print the JSON schema of the options
    Schema(schema::SchemaCommand),

    /// List the items of a Sphinx inventory
    Inventory(inventory::InventoryCommand),

    /// List the aliases of an object
    Aliases(aliases::AliasesCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };
        CliConfig {
            log_level,
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Render(cmd) => cmd.execute(),
            Commands::Schema(cmd) => cmd.execute(),
            Commands::Inventory(cmd) => cmd.execute().await,
            Commands::Aliases(cmd) => cmd.execute(),
        }
    }
}
