//! Handler options.
//!
//! - [`model`] - the [`ResolvedOptions`] record and its enumerated types
//! - [`docstrings`] - docstring styles and per-style parser options
//! - [`filters`] - compiled member name filters
//! - [`coerce`] - normalization of loosely-typed input, [`from_data`]
//! - [`merge`] - three-layer merging, [`merge_options`]
//! - [`fields`] - registry of recognized options
//! - [`schema`] - JSON Schema generation

pub mod coerce;
pub mod docstrings;
pub mod fields;
pub mod filters;
pub mod merge;
pub mod model;
pub mod schema;

pub use coerce::{CoercedOptions, coerce, extract_unknown, from_data};
pub use docstrings::{
    AutoStyleMethod, AutoStyleOptions, DocstringOptions, DocstringStyle, GoogleStyleOptions,
    NumpyStyleOptions, PerStyleOptions, SphinxStyleOptions,
};
pub use fields::{OPTION_FIELDS, OptionField, OptionGroup};
pub use filters::{DEFAULT_FILTERS, FilterPattern, Filters};
pub use merge::merge_options;
pub use model::{
    AnnotationsPath, Backlinks, InheritedMembers, MembersOption, MembersOrder, OrderMethod,
    ResolvedOptions, SectionStyle, SummaryOption,
};
pub use schema::options_json_schema;
