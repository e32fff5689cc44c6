use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::common::{HandlerArgs, options_map, parse_option};

#[derive(Args)]
pub struct RenderCommand {
    /// Dotted path of the object, such as `package.module.Class`
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    #[command(flatten)]
    pub handler: HandlerArgs,

    /// Local option overriding the configured ones, as KEY=JSON
    #[arg(short = 'O', long = "option", value_name = "KEY=JSON", value_parser = parse_option)]
    pub options: Vec<(String, serde_json::Value)>,

    /// Locale of the rendered text
    #[arg(long)]
    pub locale: Option<String>,

    /// Write the HTML to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    pub fn execute(self) -> Result<()> {
        let mut handler = self.handler.build()?;
        let options = handler.get_options(&options_map(&self.options))?;
        let item = handler.collect(&self.identifier, Some(&options))?;
        let html = handler.render(&item, &options, self.locale.as_deref())?;

        match &self.output {
            Some(path) => std::fs::write(path, html)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?,
            None => println!("{html}"),
        }
        Ok(())
    }
}
