//! Cross-reference stash.
//!
//! Cross-reference markup is longer than the text it displays, which would
//! skew line length computations when formatting signatures. Markup is
//! replaced by a key of the displayed length before formatting and put back
//! afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use regex::Regex;

/// Keys and the markup they stand for, shared by the filters of one render.
#[derive(Debug, Clone, Default)]
pub struct CrossrefStash {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl CrossrefStash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `crossref` and return a unique identifier-like key of `length` characters.
    pub fn stash(&self, crossref: impl Into<String>, length: usize) -> String {
        let mut entries = self.entries();
        let mut key = generate_key(length);
        while entries.contains_key(&key) {
            key = generate_key(length);
        }
        entries.insert(key.clone(), crossref.into());
        key
    }

    /// Replace every stashed key found in `text` by its markup, then empty the stash.
    pub fn restore(&self, text: &str) -> String {
        let mut entries = self.entries();
        let mut restored = text.to_string();
        for (key, crossref) in entries.drain() {
            match Regex::new(&format!(r"\b{}\b", regex::escape(&key))) {
                Ok(pattern) => {
                    restored =
                        pattern.replace_all(&restored, regex::NoExpand(&crossref)).into_owned();
                }
                Err(error) => tracing::debug!("Invalid stash key {key}: {error}"),
            }
        }
        restored
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

/// `_` followed by random alphanumerics, `length` characters in total (at least 2).
fn generate_key(length: usize) -> String {
    let mut key = String::from("_");
    while key.len() < length.max(2) {
        key.push_str(&uuid::Uuid::new_v4().simple().to_string());
    }
    key.truncate(length.max(2));
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_have_requested_length() {
        let stash = CrossrefStash::new();
        for length in [1, 2, 5, 40, 70] {
            let key = stash.stash("<autoref>x</autoref>", length);
            assert_eq!(key.len(), length.max(2));
            assert!(key.starts_with('_'));
            assert!(key.chars().skip(1).all(|c| c.is_ascii_alphanumeric()));
        }
        assert_eq!(stash.len(), 5);
    }

    #[test]
    fn test_restore_replaces_whole_words_and_clears() {
        let stash = CrossrefStash::new();
        let key = stash.stash(r#"<autoref identifier="pkg.Type">Type</autoref>"#, 4);
        let text = format!("def f(x: {key}) -> {key}");
        let restored = stash.restore(&text);
        assert_eq!(
            restored,
            r#"def f(x: <autoref identifier="pkg.Type">Type</autoref>) -> <autoref identifier="pkg.Type">Type</autoref>"#
        );
        assert!(stash.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let stash = CrossrefStash::new();
        let shared = stash.clone();
        shared.stash("$1 is not a group", 6);
        assert_eq!(stash.len(), 1);
        stash.clear();
        assert!(shared.is_empty());
    }
}
