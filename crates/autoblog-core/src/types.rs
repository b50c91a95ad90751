//! Article titles and batch-level de-duplication

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum title length, counted in characters
pub const MAX_TITLE_CHARS: usize = 200;

/// Characters a title may not contain
pub const FORBIDDEN_TITLE_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\', '/'];

/// Reasons a title is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// Empty or whitespace-only
    #[error("title is empty")]
    Empty,

    /// Longer than [`MAX_TITLE_CHARS`]
    #[error("title exceeds 200 characters ({0} given)")]
    TooLong(usize),

    /// Contains one of [`FORBIDDEN_TITLE_CHARS`]
    #[error("title contains forbidden character: {0}")]
    ForbiddenChar(char),

    /// Already present in the batch
    #[error("title already entered: {0}")]
    Duplicate(String),
}

/// A validated article title
///
/// Titles are immutable once accepted. Validation does not trim; callers
/// collecting titles from user input trim before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and wrap a title
    pub fn parse(raw: impl Into<String>) -> Result<Self, TitleError> {
        let raw = raw.into();

        if raw.trim().is_empty() {
            return Err(TitleError::Empty);
        }

        let len = raw.chars().count();
        if len > MAX_TITLE_CHARS {
            return Err(TitleError::TooLong(len));
        }

        if let Some(c) = raw.chars().find(|c| FORBIDDEN_TITLE_CHARS.contains(c)) {
            return Err(TitleError::ForbiddenChar(c));
        }

        Ok(Self(raw))
    }

    /// Borrow the title text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Title {
    type Err = TitleError;

    fn from_str(s: &str) -> Result<Self, TitleError> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Title {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, TitleError> {
        Self::parse(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of titles for one batch
///
/// Keeps input order and rejects exact (case-sensitive) duplicates.
#[derive(Debug, Clone, Default)]
pub struct TitleSet {
    titles: Vec<Title>,
    seen: HashSet<String>,
}

impl TitleSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `raw` and append it unless already present
    pub fn insert(&mut self, raw: impl Into<String>) -> Result<&Title, TitleError> {
        let title = Title::parse(raw)?;
        if self.seen.contains(title.as_str()) {
            return Err(TitleError::Duplicate(title.into_inner()));
        }
        self.seen.insert(title.as_str().to_string());
        self.titles.push(title);
        Ok(&self.titles[self.titles.len() - 1])
    }

    /// Number of accepted titles
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// True when no title was accepted
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Iterate in input order
    pub fn iter(&self) -> std::slice::Iter<'_, Title> {
        self.titles.iter()
    }

    /// Titles in input order
    pub fn as_slice(&self) -> &[Title] {
        &self.titles
    }

    /// Consume into the ordered title list
    pub fn into_vec(self) -> Vec<Title> {
        self.titles
    }
}

impl<'a> IntoIterator for &'a TitleSet {
    type Item = &'a Title;
    type IntoIter = std::slice::Iter<'a, Title>;

    fn into_iter(self) -> Self::IntoIter {
        self.titles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_plain_text() {
        let title = Title::parse("Intro to Rust").unwrap();
        assert_eq!(title.as_str(), "Intro to Rust");
        assert_eq!(title.to_string(), "Intro to Rust");

        assert!(Title::parse("Rustで始める非同期プログラミング").is_ok());
        assert!(Title::parse("Hello, World!").is_ok());
    }

    #[test]
    fn test_title_rejects_empty() {
        assert_eq!(Title::parse(""), Err(TitleError::Empty));
        assert_eq!(Title::parse("   "), Err(TitleError::Empty));
        assert_eq!(Title::parse("\t\u{3000}"), Err(TitleError::Empty));
    }

    #[test]
    fn test_title_length_limit_counts_chars() {
        assert!(Title::parse("a".repeat(200)).is_ok());
        assert_eq!(Title::parse("a".repeat(201)), Err(TitleError::TooLong(201)));

        // Multi-byte characters count once each
        assert!(Title::parse("あ".repeat(200)).is_ok());
        assert!(Title::parse("あ".repeat(201)).is_err());
    }

    #[test]
    fn test_title_rejects_each_forbidden_char() {
        for c in FORBIDDEN_TITLE_CHARS {
            let raw = format!("bad {} title", c);
            assert_eq!(Title::parse(raw), Err(TitleError::ForbiddenChar(*c)));
        }
    }

    #[test]
    fn test_title_serde_validates() {
        let title: Title = serde_json::from_str("\"Valid title\"").unwrap();
        assert_eq!(title.as_str(), "Valid title");

        assert!(serde_json::from_str::<Title>("\"a/b\"").is_err());
    }

    #[test]
    fn test_title_set_rejects_duplicates() {
        let mut set = TitleSet::new();
        set.insert("Intro to X").unwrap();

        let err = set.insert("Intro to X").unwrap_err();
        assert_eq!(err, TitleError::Duplicate("Intro to X".to_string()));

        // Case-sensitive
        set.insert("intro to x").unwrap();

        assert_eq!(set.len(), 2);
        let titles: Vec<&str> = set.iter().map(Title::as_str).collect();
        assert_eq!(titles, vec!["Intro to X", "intro to x"]);
    }

    #[test]
    fn test_title_set_invalid_does_not_mark_seen() {
        let mut set = TitleSet::new();
        assert!(set.insert("a?b").is_err());
        assert!(set.is_empty());
    }
}
