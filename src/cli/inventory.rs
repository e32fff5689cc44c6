use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::handler::PythonHandler;
use crate::inventory::fetch_inventory;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `identifier<TAB>url` line per item
    #[default]
    Text,
    /// A JSON object mapping identifiers to URLs
    Json,
}

#[derive(Args)]
pub struct InventoryCommand {
    /// URL or local path of an `objects.inv` file
    #[arg(value_name = "URL")]
    pub url: String,

    /// Base URL of the items, defaults to the inventory's directory
    #[arg(long)]
    pub base_url: Option<String>,

    /// Domain to keep, repeatable (default: py)
    #[arg(long = "domain")]
    pub domains: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl InventoryCommand {
    pub async fn execute(self) -> Result<()> {
        let bytes = fetch_inventory(&self.url).await?;
        let domains = (!self.domains.is_empty()).then_some(self.domains.as_slice());
        let items = PythonHandler::load_inventory(
            bytes.as_slice(),
            &self.url,
            self.base_url.as_deref(),
            domains,
        )?;

        match self.format {
            OutputFormat::Text => {
                for (identifier, url) in items {
                    println!("{identifier}\t{url}");
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> =
                    items.into_iter().map(|(identifier, url)| (identifier, url.into())).collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            }
        }
        Ok(())
    }
}
