//! Handler configuration.
//!
//! The handler is configured once per site, with:
//!
//! - `paths`: where module dumps are searched, glob patterns relative to the
//!   configuration file directory (default `["."]`)
//! - `inventories`: external Sphinx inventories (legacy key `import`)
//! - `load_external_modules`: whether alias resolution may load modules that
//!   were not requested
//! - `options`: global rendering options, merged under each directive's local
//!   options by [`merge_options`](crate::options::merge_options)
//! - `locale`: default locale passed to templates
//!
//! ```toml
//! paths = ["src"]
//! inventories = ["https://docs.python.org/3/objects.inv"]
//!
//! [options]
//! docstring_style = "numpy"
//! members_order = "source"
//! ```

mod handler;
mod parser;

pub use handler::{HandlerConfig, Inventory, normalize_path, resolve_search_paths};
pub use parser::{ConfigFormat, load_handler_config, parse_config};
