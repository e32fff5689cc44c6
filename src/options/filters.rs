//! Member name filters.

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Filters applied by default: exclude private names (`_x`, not `__x__`).
pub const DEFAULT_FILTERS: &[&str] = &["!^_[^_]"];

/// A compiled name pattern with its polarity.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    pub pattern: Regex,
    /// `true` removes matching names, `false` requires a match
    pub exclude: bool,
}

impl FilterPattern {
    /// Compile a raw filter: a leading `!` marks an exclusion and is stripped.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the pattern does not compile.
    pub fn parse(raw: &str) -> Result<Self, regex::Error> {
        let (exclude, source) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        Ok(Self {
            pattern: Regex::new(source)?,
            exclude,
        })
    }

    /// Back to the raw `!pattern` form.
    #[must_use]
    pub fn raw(&self) -> String {
        if self.exclude {
            format!("!{}", self.pattern.as_str())
        } else {
            self.pattern.as_str().to_string()
        }
    }

    /// Whether the pattern matches anywhere in `name`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

impl PartialEq for FilterPattern {
    fn eq(&self, other: &Self) -> bool {
        self.exclude == other.exclude && self.pattern.as_str() == other.pattern.as_str()
    }
}

/// The `filters` option: an ordered pattern list or the `"public"` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Filters {
    /// Keep members whose `is_public` is true
    Public,
    Patterns(Vec<FilterPattern>),
}

impl Filters {
    /// Compile raw filter strings, `"public"` being the sentinel.
    ///
    /// # Errors
    ///
    /// Returns the regex error of the first pattern that does not compile.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, regex::Error> {
        raw.iter()
            .map(|filter| FilterPattern::parse(filter.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Patterns)
    }

    #[must_use]
    pub fn patterns(&self) -> Option<&[FilterPattern]> {
        match self {
            Self::Public => None,
            Self::Patterns(patterns) => Some(patterns),
        }
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::Patterns(
            DEFAULT_FILTERS.iter().filter_map(|raw| FilterPattern::parse(raw).ok()).collect(),
        )
    }
}

impl Serialize for Filters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Public => serializer.serialize_str("public"),
            Self::Patterns(patterns) => {
                let raw: Vec<String> = patterns.iter().map(FilterPattern::raw).collect();
                raw.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Filters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawFilters {
            One(String),
            Many(Vec<String>),
        }

        match RawFilters::deserialize(deserializer)? {
            RawFilters::One(value) if value == "public" => Ok(Self::Public),
            RawFilters::One(value) => Err(de::Error::custom(format!(
                "expected \"public\" or a list of patterns, found \"{value}\""
            ))),
            RawFilters::Many(raw) => Self::parse(&raw).map_err(de::Error::custom),
        }
    }
}
