//! Splitting object paths into cross-reference segments.
//!
//! `package.module.Class` is rendered as three links, each word pointing at
//! its own cumulative path. Paths may also contain call parentheses, as in
//! `package.function(param)`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// One segment of a split path.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PathSegment {
    /// Separator before the word (`.`, `(` or empty)
    pub prefix: String,
    pub word: String,
    /// Path up to and including this word, computed on the full path
    pub full_path: String,
    /// `)` when the word closes a call, empty otherwise
    pub suffix: String,
}

impl PathSegment {
    fn new(prefix: &str, word: &str, full_path: String, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            word: word.to_string(),
            full_path,
            suffix: suffix.to_string(),
        }
    }
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| Regex::new(r"([.(]?)(\w+)(\))?").expect("segment pattern is valid"))
}

fn separator_regex() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[().]").expect("separator pattern is valid"))
}

/// Split `path` into segments, computing cumulative paths on `full_path`.
///
/// When `path` is a shortened display of `full_path` (for example `Class.method`
/// for `package.module.Class.method`), only the segments of the displayed words
/// are returned and the first one loses its prefix. A path with no separator
/// is returned as a single segment pointing at `full_path`.
#[must_use]
pub fn split_path(path: &str, full_path: &str) -> Vec<PathSegment> {
    if !separator_regex().is_match(path) {
        return vec![PathSegment::new("", path, full_path.to_string(), "")];
    }

    let full_segments = cumulative_segments(full_path);
    if path == full_path {
        return full_segments;
    }

    let by_word: HashMap<&str, &PathSegment> =
        full_segments.iter().map(|segment| (segment.word.as_str(), segment)).collect();
    let displayed = cumulative_segments(path);
    displayed
        .iter()
        .enumerate()
        .map(|(index, own)| {
            let segment = by_word.get(own.word.as_str()).copied().unwrap_or(own);
            let prefix = if index == 0 { "" } else { segment.prefix.as_str() };
            PathSegment::new(prefix, &segment.word, segment.full_path.clone(), &segment.suffix)
        })
        .collect()
}

fn cumulative_segments(path: &str) -> Vec<PathSegment> {
    let mut current = String::new();
    segment_regex()
        .captures_iter(path)
        .map(|captures| {
            let prefix = captures.get(1).map_or("", |found| found.as_str());
            let word = captures.get(2).map_or("", |found| found.as_str());
            let suffix = captures.get(3).map_or("", |found| found.as_str());
            if current.is_empty() {
                current = word.to_string();
            } else {
                current = format!("{current}{prefix}{word}{suffix}");
            }
            PathSegment::new(prefix, word, current.clone(), suffix)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuples(segments: &[PathSegment]) -> Vec<(&str, &str, &str, &str)> {
        segments
            .iter()
            .map(|segment| {
                (
                    segment.prefix.as_str(),
                    segment.word.as_str(),
                    segment.full_path.as_str(),
                    segment.suffix.as_str(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_word() {
        let segments = split_path("Class", "package.module.Class");
        assert_eq!(tuples(&segments), vec![("", "Class", "package.module.Class", "")]);
    }

    #[test]
    fn test_full_path() {
        let segments = split_path("package.module.Class", "package.module.Class");
        assert_eq!(
            tuples(&segments),
            vec![
                ("", "package", "package", ""),
                (".", "module", "package.module", ""),
                (".", "Class", "package.module.Class", ""),
            ]
        );
    }

    #[test]
    fn test_shortened_display_path() {
        let segments = split_path("Class.method", "package.module.Class.method");
        assert_eq!(
            tuples(&segments),
            vec![
                ("", "Class", "package.module.Class", ""),
                (".", "method", "package.module.Class.method", ""),
            ]
        );
    }

    #[test]
    fn test_parameter_suffix() {
        let segments = split_path("package.function(param)", "package.function(param)");
        assert_eq!(
            tuples(&segments),
            vec![
                ("", "package", "package", ""),
                (".", "function", "package.function", ""),
                ("(", "param", "package.function(param)", ")"),
            ]
        );
    }

    #[test]
    fn test_unknown_display_word_uses_own_path() {
        let segments = split_path("other.name", "package.name");
        assert_eq!(
            tuples(&segments),
            vec![("", "other", "other", ""), (".", "name", "package.name", "")]
        );
    }
}
