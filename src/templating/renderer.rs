//! Rendering objects to HTML with Tera.
//!
//! Every render builds a fresh [`Tera`] instance holding the bundled
//! templates, the custom templates of the site and the filters of
//! [`filters::register`]. Members are rendered recursively through the
//! `render_object` template function.

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock, Weak};

use tera::{Context, Tera, Value};
use tracing::{debug, warn};

use super::error::template_error;
use super::filters::{self, RenderState, template_name};
use super::stash::CrossrefStash;
use crate::core::{HandlerError, HandlerResult};
use crate::formatter::{Formatter, default_formatter};
use crate::objects::{ObjectTree, object_view};
use crate::options::ResolvedOptions;

/// Base templates, registered under `_base/`.
const BASE_TEMPLATES: &[(&str, &str)] = &[
    ("_base/macros.html", include_str!("templates/macros.html")),
    ("_base/module.html", include_str!("templates/module.html")),
    ("_base/class.html", include_str!("templates/class.html")),
    ("_base/function.html", include_str!("templates/function.html")),
    ("_base/attribute.html", include_str!("templates/attribute.html")),
    ("_base/type_alias.html", include_str!("templates/type_alias.html")),
];

/// Templates a site may override; each extends its `_base/` counterpart.
pub const OVERRIDABLE_TEMPLATES: &[&str] =
    &["module", "class", "function", "attribute", "type_alias"];

/// Locale used when neither the site nor the directive sets one.
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone)]
pub struct Renderer {
    custom_templates: Option<PathBuf>,
    formatter: Arc<dyn Formatter>,
}

impl Renderer {
    /// Renderer reading site templates from `<custom_templates>/python/`.
    pub fn new(custom_templates: Option<PathBuf>, formatter: Arc<dyn Formatter>) -> Self {
        if let Some(dir) = &custom_templates {
            let base = dir.join("python").join("_base");
            if base.is_dir() {
                warn!(
                    "Overriding base template '{}' is not supported, override templates outside of `_base` instead",
                    base.display()
                );
            }
        }
        Self {
            custom_templates,
            formatter,
        }
    }

    /// Renderer with the process-wide formatter.
    pub fn with_default_formatter(custom_templates: Option<PathBuf>) -> Self {
        Self::new(custom_templates, default_formatter())
    }

    pub fn formatter(&self) -> &Arc<dyn Formatter> {
        &self.formatter
    }

    /// Bundled templates followed by the site's templates, which replace
    /// bundled ones of the same name.
    fn templates(&self) -> HandlerResult<Vec<(String, String)>> {
        let mut templates: Vec<(String, String)> = BASE_TEMPLATES
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        for name in OVERRIDABLE_TEMPLATES {
            let content = format!(r#"{{% extends "_base/{name}.html" %}}"#);
            templates.push((format!("{name}.html"), content));
        }

        for (name, content) in self.custom()? {
            debug!("Using custom template {name}");
            match templates.iter_mut().find(|(existing, _)| existing == &name) {
                Some(template) => template.1 = content,
                None => templates.push((name, content)),
            }
        }
        Ok(templates)
    }

    fn custom(&self) -> HandlerResult<Vec<(String, String)>> {
        let Some(dir) = &self.custom_templates else {
            return Ok(Vec::new());
        };
        let root = dir.join("python");
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!("{}/**/*.html", glob::Pattern::escape(&root.to_string_lossy()));
        let entries = glob::glob(&pattern)
            .map_err(|error| HandlerError::config("custom_templates", error.msg))?;
        let mut found = Vec::new();
        for entry in entries {
            let path = entry.map_err(|error| HandlerError::Io {
                operation: "listing custom templates".to_string(),
                path: error.path().display().to_string(),
                message: error.error().to_string(),
            })?;
            let Some(name) = template_key(&root, &path) else {
                continue;
            };
            if name.starts_with("_base/") {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|error| HandlerError::Io {
                operation: "reading custom template".to_string(),
                path: path.display().to_string(),
                message: error.to_string(),
            })?;
            found.push((name, content));
        }
        Ok(found)
    }

    /// Names of the templates available to a render.
    pub fn template_names(&self) -> HandlerResult<Vec<String>> {
        Ok(self.templates()?.into_iter().map(|(name, _)| name).collect())
    }

    /// Render the object found at `identifier` in `tree`.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Collection`] when the object cannot be found,
    /// [`HandlerError::Template`] when a template fails to load or render.
    pub fn render(
        &self,
        tree: Arc<ObjectTree>,
        identifier: &str,
        options: &ResolvedOptions,
        locale: Option<&str>,
    ) -> HandlerResult<String> {
        let object = tree.find(identifier)?;
        let view = object_view(object);
        let template = template_name(&view).ok_or_else(|| HandlerError::Template {
            template: identifier.to_string(),
            message: "object has no kind".to_string(),
        })?;

        let state = RenderState {
            tree: Arc::clone(&tree),
            options: Arc::new(options.clone()),
            stash: CrossrefStash::new(),
            formatter: Arc::clone(&self.formatter),
        };
        let mut base = Context::new();
        base.insert("config", &options.template_config());
        base.insert("locale", locale.unwrap_or(DEFAULT_LOCALE));

        let engine: Arc<OnceLock<Tera>> = Arc::new(OnceLock::new());
        let mut tera = Tera::default();
        tera.add_raw_templates(self.templates()?)
            .map_err(|error| template_error("templates", &error))?;
        filters::register(&mut tera, &state);
        tera.register_function(
            "render_object",
            render_object_function(Arc::downgrade(&engine), base.clone()),
        );
        let tera = engine.get_or_init(|| tera);

        let mut context = base;
        insert_object(&mut context, &view);
        context.insert("heading_level", &options.heading_level);
        context.insert("root", &true);
        context.insert("root_members", &false);

        debug!("Rendering {identifier} with template {template}");
        let html = tera
            .render(&template, &context)
            .map_err(|error| template_error(&template, &error))?;
        let html = state.stash.restore(&html);
        state.stash.clear();
        Ok(html)
    }
}

/// Template name of `path` relative to `root`, with `/` separators.
fn template_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

/// Expose a view to templates under its kind (`module`, `class`...).
fn insert_object(context: &mut Context, view: &Value) {
    let kind = view.get("kind").and_then(Value::as_str).unwrap_or("object");
    context.insert(kind, view);
    context.insert("object", view);
}

/// `render_object(object=..., heading_level=..., root_members=false)`.
///
/// Holds a weak reference to the engine: the engine owns this function.
fn render_object_function(
    engine: Weak<OnceLock<Tera>>,
    base: Context,
) -> impl tera::Function + 'static {
    move |args: &std::collections::HashMap<String, Value>| -> tera::Result<Value> {
        let engine = engine.upgrade().ok_or_else(|| tera::Error::msg("renderer is gone"))?;
        let tera = engine.get().ok_or_else(|| tera::Error::msg("renderer is not ready"))?;

        let view = args
            .get("object")
            .ok_or_else(|| tera::Error::msg("render_object requires an `object`"))?;
        let heading_level = args
            .get("heading_level")
            .and_then(Value::as_u64)
            .ok_or_else(|| tera::Error::msg("render_object requires a `heading_level`"))?;
        let root_members = args.get("root_members").and_then(Value::as_bool).unwrap_or(false);
        let template = template_name(view)
            .ok_or_else(|| tera::Error::msg("render_object expects an object view"))?;

        let mut context = base.clone();
        insert_object(&mut context, view);
        context.insert("heading_level", &heading_level);
        context.insert("root", &false);
        context.insert("root_members", &root_members);
        let path = view.get("path").and_then(Value::as_str).unwrap_or_default();
        tera.render(&template, &context)
            .map(Value::String)
            .map_err(|error| tera::Error::chain(format!("Failed to render {path}"), error))
    }
}
