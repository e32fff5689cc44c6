//! HTML rendering of collected objects.
//!
//! Rendering is done with Tera. The bundled templates live under `_base/`
//! and are extended by one thin template per object kind (`module.html`,
//! `class.html`...), which sites may replace with their own through the
//! `custom_templates` directory:
//!
//! ```text
//! custom_templates/
//! └── python/
//!     └── function.html     {% extends "_base/function.html" %} ...
//! ```
//!
//! Templates receive the resolved options as `config`, the object under its
//! kind name, `heading_level`, `root` and `locale`. Members are rendered with
//! `render_object(object=member, heading_level=...)` after going through the
//! `filter_objects` and `order_members` filters.

pub mod error;
pub mod filters;
pub mod renderer;
pub mod sections;
pub mod stash;

pub use error::{format_tera_error, template_error};
pub use filters::{RenderState, template_name};
pub use renderer::{DEFAULT_LOCALE, OVERRIDABLE_TEMPLATES, Renderer};
pub use sections::{Section, SectionItem, SectionKind};
pub use stash::CrossrefStash;
