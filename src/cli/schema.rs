use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::options::options_json_schema;

#[derive(Args)]
pub struct SchemaCommand {
    /// Write the schema to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SchemaCommand {
    pub fn execute(self) -> Result<()> {
        let schema = serde_json::to_string_pretty(&options_json_schema())?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{schema}\n"))
                    .with_context(|| format!("Failed to write schema file: {}", path.display()))?;
                eprintln!("{} Wrote options schema to {}", "✓".green(), path.display());
            }
            None => println!("{schema}"),
        }
        Ok(())
    }
}
