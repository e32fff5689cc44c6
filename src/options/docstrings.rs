//! Docstring style and the per-style parser option records.
//!
//! Unknown keys inside a style record are rejected: they are passed verbatim
//! to the docstring parser, so a typo would otherwise be silently ignored.

use serde::{Deserialize, Serialize};

/// Docstring styles understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    Auto,
    Google,
    Numpy,
    Sphinx,
}

impl DocstringStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Google => "google",
            Self::Numpy => "numpy",
            Self::Sphinx => "sphinx",
        }
    }

    /// Parse a style name, `None` when unrecognized.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(Self::Auto),
            "google" => Some(Self::Google),
            "numpy" => Some(Self::Numpy),
            "sphinx" => Some(Self::Sphinx),
            _ => None,
        }
    }
}

/// Google-style parser options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleStyleOptions {
    /// Ignore the first line of `__init__` docstrings
    pub ignore_init_summary: bool,
    /// Parse every item of a `Returns` section as a separate return value
    pub returns_multiple_items: bool,
    /// Read `name: description` items of `Returns` as named values
    pub returns_named_value: bool,
    /// Read the return type of properties from the summary line
    pub returns_type_in_property_summary: bool,
    pub receives_multiple_items: bool,
    pub receives_named_value: bool,
    /// Remove doctest flags from example blocks
    pub trim_doctest_flags: bool,
    /// Warn about documented parameters absent from the signature
    pub warn_unknown_params: bool,
}

impl Default for GoogleStyleOptions {
    fn default() -> Self {
        Self {
            ignore_init_summary: false,
            returns_multiple_items: true,
            returns_named_value: true,
            returns_type_in_property_summary: false,
            receives_multiple_items: true,
            receives_named_value: true,
            trim_doctest_flags: true,
            warn_unknown_params: true,
        }
    }
}

/// Numpydoc-style parser options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumpyStyleOptions {
    pub ignore_init_summary: bool,
    pub trim_doctest_flags: bool,
    pub warn_unknown_params: bool,
}

impl Default for NumpyStyleOptions {
    fn default() -> Self {
        Self {
            ignore_init_summary: false,
            trim_doctest_flags: true,
            warn_unknown_params: true,
        }
    }
}

/// Sphinx-style parser options. The Sphinx parser takes none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphinxStyleOptions {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerStyleOptions {
    pub google: GoogleStyleOptions,
    pub numpy: NumpyStyleOptions,
    pub sphinx: SphinxStyleOptions,
}

/// How the auto style picks a parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStyleMethod {
    #[default]
    Heuristics,
    MaxSections,
}

/// Options of the auto style, which detects the style of each docstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoStyleOptions {
    pub method: AutoStyleMethod,
    /// Styles to try, in order
    pub style_order: Vec<String>,
    /// Style used when detection finds nothing
    pub default: Option<String>,
    pub per_style_options: PerStyleOptions,
}

impl Default for AutoStyleOptions {
    fn default() -> Self {
        Self {
            method: AutoStyleMethod::Heuristics,
            style_order: vec!["sphinx".to_string(), "google".to_string(), "numpy".to_string()],
            default: None,
            per_style_options: PerStyleOptions::default(),
        }
    }
}

/// Parser options for the selected docstring style.
///
/// Serialized with a `style` tag. Raw input never carries the tag: option
/// coercion injects it from the sibling `docstring_style` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum DocstringOptions {
    Auto(AutoStyleOptions),
    Google(GoogleStyleOptions),
    Numpy(NumpyStyleOptions),
    Sphinx(SphinxStyleOptions),
}

impl DocstringOptions {
    #[must_use]
    pub const fn style(&self) -> DocstringStyle {
        match self {
            Self::Auto(_) => DocstringStyle::Auto,
            Self::Google(_) => DocstringStyle::Google,
            Self::Numpy(_) => DocstringStyle::Numpy,
            Self::Sphinx(_) => DocstringStyle::Sphinx,
        }
    }

    /// Options as the flat mapping handed to the docstring parser (no tag).
    #[must_use]
    pub fn parser_options(&self) -> serde_json::Map<String, serde_json::Value> {
        let value = match self {
            Self::Auto(options) => serde_json::to_value(options),
            Self::Google(options) => serde_json::to_value(options),
            Self::Numpy(options) => serde_json::to_value(options),
            Self::Sphinx(options) => serde_json::to_value(options),
        };
        match value {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_options_fill_defaults() {
        let raw = json!({"style": "google", "ignore_init_summary": true});
        let options: DocstringOptions = serde_json::from_value(raw).unwrap();
        match options {
            DocstringOptions::Google(google) => {
                assert!(google.ignore_init_summary);
                assert!(google.trim_doctest_flags);
            }
            other => panic!("unexpected options: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_style_field_rejected() {
        let result: Result<DocstringOptions, _> =
            serde_json::from_value(json!({"style": "numpy", "returns_named_value": true}));
        assert!(result.is_err());
    }

    #[test]
    fn test_parser_options_have_no_tag() {
        let options = DocstringOptions::Auto(AutoStyleOptions::default());
        let map = options.parser_options();
        assert!(!map.contains_key("style"));
        assert_eq!(map["method"], "heuristics");
        assert_eq!(map["style_order"], json!(["sphinx", "google", "numpy"]));
    }
}
