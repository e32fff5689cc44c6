//! Coercion of loosely-typed option mappings.
//!
//! Options arrive from configuration files as plain JSON-like values. Coercion
//! normalizes the shapes that have shorthand forms and separates unknown keys,
//! then every known option is validated on its own so errors name the option.

use serde_json::{Map, Value, json};
use tracing::debug;

use super::docstrings::DocstringStyle;
use super::fields;
use super::model::{ResolvedOptions, SummaryOption};
use crate::core::{HandlerError, HandlerResult};

/// Options split into recognized and unrecognized keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedOptions {
    /// Known options, in their normalized shape
    pub known: Map<String, Value>,
    /// Keys not in the option registry, passed through untouched
    pub unknown: Map<String, Value>,
}

/// Split unknown keys out without coercing anything.
#[must_use]
pub fn extract_unknown(raw: &Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut known = Map::new();
    let mut unknown = Map::new();
    for (key, value) in raw {
        if fields::is_known(key) {
            known.insert(key.clone(), value.clone());
        } else {
            unknown.insert(key.clone(), value.clone());
        }
    }
    (known, unknown)
}

/// Normalize a raw option mapping.
///
/// Never fails on unknown keys. Fails on known keys whose value has an
/// unparseable shape, naming the offending option.
///
/// # Errors
///
/// [`HandlerError::Config`] for malformed known options, including
/// `docstring_options` given together with an unrecognized `docstring_style`.
pub fn coerce(raw: &Map<String, Value>) -> HandlerResult<CoercedOptions> {
    let (mut known, unknown) = extract_unknown(raw);
    if !unknown.is_empty() {
        debug!("Unknown options kept aside: {:?}", unknown.keys().collect::<Vec<_>>());
    }

    coerce_docstring_options(&mut known)?;

    if let Some(Value::Bool(enabled)) = known.get("summary") {
        let expanded = serde_json::to_value(SummaryOption::all(*enabled))
            .map_err(|error| HandlerError::config("summary", error.to_string()))?;
        known.insert("summary".to_string(), expanded);
    }

    if known.get("filters").is_some_and(Value::is_null) {
        known.insert("filters".to_string(), json!([]));
    }

    for (key, value) in &known {
        validate_option(key, value)?;
    }

    Ok(CoercedOptions {
        known,
        unknown,
    })
}

/// Tag `docstring_options` with the style chosen by `docstring_style`.
fn coerce_docstring_options(known: &mut Map<String, Value>) -> HandlerResult<()> {
    let Some(options) = known.get("docstring_options") else {
        return Ok(());
    };
    if options.is_null() {
        return Ok(());
    }

    let style = match known.get("docstring_style") {
        None => DocstringStyle::Google,
        Some(Value::Null) => {
            debug!("docstring_style is null, ignoring docstring_options");
            known.insert("docstring_options".to_string(), Value::Null);
            return Ok(());
        }
        Some(Value::String(name)) => DocstringStyle::from_name(name).ok_or_else(|| {
            HandlerError::config(
                "docstring_style",
                format!("unrecognized style '{name}' for the given docstring_options"),
            )
        })?,
        Some(other) => {
            return Err(HandlerError::config(
                "docstring_style",
                format!("expected a style name, found {other}"),
            ));
        }
    };

    let Some(Value::Object(options)) = known.get_mut("docstring_options") else {
        return Err(HandlerError::config("docstring_options", "expected a mapping"));
    };
    options.insert("style".to_string(), Value::from(style.as_str()));
    Ok(())
}

/// Deserialize one option alone to report errors against its name.
fn validate_option(key: &str, value: &Value) -> HandlerResult<()> {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    serde_json::from_value::<ResolvedOptions>(Value::Object(single))
        .map(|_| ())
        .map_err(|error| HandlerError::config(key, error.to_string()))
}

/// Coerce then build the resolved record.
///
/// Unknown keys end up in [`ResolvedOptions::unknown`].
///
/// # Errors
///
/// Same as [`coerce`].
pub fn from_data(raw: &Map<String, Value>) -> HandlerResult<ResolvedOptions> {
    let CoercedOptions {
        known,
        unknown,
    } = coerce(raw)?;
    let mut options: ResolvedOptions = serde_json::from_value(Value::Object(known))
        .map_err(|error| HandlerError::config("options", error.to_string()))?;
    options.unknown = unknown;
    Ok(options)
}
