use anyhow::Result;
use clap::Args;
use serde_json::Map;

use super::common::HandlerArgs;

#[derive(Args)]
pub struct AliasesCommand {
    /// Dotted path of the object, optionally followed by `(parameter)`
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    #[command(flatten)]
    pub handler: HandlerArgs,
}

impl AliasesCommand {
    pub fn execute(self) -> Result<()> {
        let mut handler = self.handler.build()?;
        let options = handler.get_options(&Map::new())?;
        let object = self.identifier.split('(').next().unwrap_or(&self.identifier);
        handler.collect(object, Some(&options))?;
        for alias in handler.get_aliases(&self.identifier) {
            println!("{alias}");
        }
        Ok(())
    }
}
