//! pydocs-handler: documentation for Python objects.
//!
//! Given a dotted identifier (`package.module.Class`), the handler collects
//! the object and its members from module dumps, then renders them to HTML
//! with Tera templates. Rendering honors the options of the mkdocstrings
//! Python handler: member filtering and ordering, inherited members,
//! docstring styles, signature formatting.
//!
//! # Pipeline
//!
//! 1. [`options`]: global and local options are merged and coerced into an
//!    immutable [`ResolvedOptions`](options::ResolvedOptions)
//! 2. [`loader`]: modules are loaded once into a
//!    [`ModulesCollection`](loader::ModulesCollection) and aliases resolved
//! 3. [`members`]: templates select and order members with
//!    [`filter_objects`](members::filter_objects) and
//!    [`order_members`](members::order_members)
//! 4. [`templating`]: objects are rendered, recursively
//!
//! [`handler::PythonHandler`] ties these together.
//!
//! # Modules
//!
//! - [`config`] - Handler configuration and configuration files
//! - [`core`] - Error types
//! - [`formatter`] - External code formatters (Black, Ruff)
//! - [`inventory`] - Sphinx inventories
//! - [`objects`] - Object tree
//! - [`paths`] - Splitting paths into cross-referenceable parts
//! - [`cli`] - The `pydocs` command

pub mod cli;
pub mod config;
pub mod core;
pub mod formatter;
pub mod handler;
pub mod inventory;
pub mod loader;
pub mod members;
pub mod objects;
pub mod options;
pub mod paths;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
