//! Article output: markdown cleanup, slugs and dated files

use crate::{Error, Result, Title};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Maximum slug length in characters
const MAX_SLUG_CHARS: usize = 50;

/// Characters removed when building a slug
const SLUG_STRIP_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const UNTITLED_SLUG: &str = "untitled";

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(#{1,2})([^#\s].*)$").expect("valid heading regex"))
}

/// Clean up generated markdown
///
/// - trailing whitespace is removed from every line
/// - `#Title` / `##Title` headings get a single space after the marker
/// - runs of blank lines collapse into one blank line
/// - leading and trailing whitespace of the document is removed
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_markdown(content: &str) -> String {
    let heading = heading_pattern();
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in content.trim().lines() {
        let line = line.trim_end();

        if line.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;

        match heading.captures(line) {
            Some(caps) => lines.push(format!("{} {}", &caps[1], &caps[2])),
            None => lines.push(line.to_string()),
        }
    }

    lines.join("\n").trim().to_string()
}

/// Derive a filesystem-safe slug from a title
///
/// NFKC-normalizes, strips path-hostile characters, joins words with
/// underscores and caps the result at 50 characters. Falls back to
/// `untitled` when nothing remains.
pub fn title_slug(title: &str) -> String {
    let normalized: String = title
        .trim()
        .nfkc()
        .filter(|c| !SLUG_STRIP_CHARS.contains(c))
        .collect();

    let mut slug = String::with_capacity(normalized.len());
    let mut in_space = false;
    for c in normalized.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('_');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }

    let mut slug = slug.trim_matches('_').to_string();

    if slug.chars().count() > MAX_SLUG_CHARS {
        slug = slug.chars().take(MAX_SLUG_CHARS).collect::<String>();
        slug = slug.trim_end_matches('_').to_string();
    }

    if slug.is_empty() {
        UNTITLED_SLUG.to_string()
    } else {
        slug
    }
}

/// Output file name: `{YYYYMMDD}_{slug}.md`
pub fn output_filename(title: &str, date: NaiveDate) -> String {
    format!("{}_{}.md", date.format("%Y%m%d"), title_slug(title))
}

/// Writes sanitized articles into an output directory
///
/// Files are overwritten when two titles map to the same name on the same
/// day.
#[derive(Debug, Clone)]
pub struct ArticleWriter {
    dir: PathBuf,
}

impl ArticleWriter {
    /// Use `dir` as-is without checks
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create `dir` if needed and verify it is a writable directory
    pub fn prepare(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let fail = |reason: String| Error::OutputDirectory {
            path: dir.display().to_string(),
            reason,
        };

        if dir.exists() && !dir.is_dir() {
            return Err(fail("exists but is not a directory".to_string()));
        }

        std::fs::create_dir_all(dir).map_err(|e| fail(e.to_string()))?;

        let probe = dir.join(".write_test");
        std::fs::write(&probe, b"test").map_err(|e| fail(format!("not writable: {}", e)))?;
        std::fs::remove_file(&probe).map_err(|e| fail(e.to_string()))?;

        debug!("Output directory ready: {}", dir.display());
        Ok(Self::new(dir))
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path the article for `title` would be written to on `date`
    pub fn path_for(&self, title: &Title, date: NaiveDate) -> PathBuf {
        self.dir.join(output_filename(title.as_str(), date))
    }

    /// Sanitize `content` and write it as the whole file for `title`
    pub async fn write(&self, title: &Title, content: &str) -> Result<PathBuf> {
        self.write_dated(title, content, Local::now().date_naive())
            .await
    }

    /// Like [`write`](Self::write) with an explicit date
    pub async fn write_dated(
        &self,
        title: &Title,
        content: &str,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let path = self.path_for(title, date);
        let body = sanitize_markdown(content);

        tokio::fs::write(&path, body.as_bytes()).await?;
        debug!("Wrote {} bytes to {}", body.len(), path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_sanitize_fixes_headings() {
        assert_eq!(sanitize_markdown("#Title"), "# Title");
        assert_eq!(sanitize_markdown("##Section"), "## Section");
        assert_eq!(sanitize_markdown("# Already fine"), "# Already fine");

        // Deeper headings and bare markers are left alone
        assert_eq!(sanitize_markdown("###Deep"), "###Deep");
        assert_eq!(sanitize_markdown("#"), "#");
    }

    #[test]
    fn test_sanitize_whitespace() {
        let input = "\n\n  # Title  \nline one   \n\n\n\n## Next\t\n\n\ntext\n\n";
        assert_eq!(
            sanitize_markdown(input),
            "# Title\nline one\n\n## Next\n\ntext"
        );
    }

    #[test]
    fn test_sanitize_keeps_single_blank_line() {
        assert_eq!(sanitize_markdown("a\n\nb"), "a\n\nb");
        assert_eq!(sanitize_markdown("a\n   \n \nb"), "a\n\nb");
        assert_eq!(sanitize_markdown("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_slug_basic() {
        assert_eq!(title_slug("Intro to Rust"), "Intro_to_Rust");
        assert_eq!(title_slug("  padded  title  "), "padded_title");
        assert_eq!(title_slug("Hello, World!"), "Hello,_World!");
    }

    #[test]
    fn test_slug_normalizes_and_strips() {
        // Full-width letters and the ideographic space fold under NFKC
        assert_eq!(title_slug("Ｒｕｓｔ\u{3000}入門"), "Rust_入門");
        assert_eq!(title_slug("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
        assert_eq!(title_slug("__edge__"), "edge");
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(title_slug(""), "untitled");
        assert_eq!(title_slug("???"), "untitled");
        assert_eq!(title_slug("  "), "untitled");
    }

    #[test]
    fn test_slug_truncates_without_trailing_underscore() {
        // 49 chars, a space, then more text: cut lands on the underscore
        let title = format!("{} tail", "a".repeat(49));
        let slug = title_slug(&title);
        assert_eq!(slug, "a".repeat(49));

        let long = "word ".repeat(30);
        assert!(title_slug(&long).chars().count() <= 50);
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename("Intro to Rust", date()),
            "20240307_Intro_to_Rust.md"
        );
    }

    #[test]
    fn test_prepare_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a").join("b");

        let writer = ArticleWriter::prepare(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join(".write_test").exists());
        assert_eq!(writer.dir(), dir.as_path());
    }

    #[test]
    fn test_prepare_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = ArticleWriter::prepare(&file).unwrap_err();
        assert!(matches!(err, Error::OutputDirectory { .. }));
    }

    #[tokio::test]
    async fn test_write_sanitizes_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ArticleWriter::prepare(temp_dir.path()).unwrap();
        let title = Title::parse("Hello World").unwrap();

        let path = writer
            .write_dated(&title, "#Hello\n\n\n\nbody  ", date())
            .await
            .unwrap();
        assert_eq!(path, temp_dir.path().join("20240307_Hello_World.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Hello\n\nbody");

        // A second title with the same slug replaces the file
        let other = Title::parse("Hello  World").unwrap();
        let second = writer
            .write_dated(&other, "second", date())
            .await
            .unwrap();
        assert_eq!(second, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_fails_when_directory_missing() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ArticleWriter::new(temp_dir.path().join("missing"));
        let title = Title::parse("Anything").unwrap();

        let err = writer.write(&title, "body").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(input in "[#a-z \t\n]{0,80}") {
            let once = sanitize_markdown(&input);
            prop_assert_eq!(sanitize_markdown(&once), once);
        }

        #[test]
        fn prop_filename_shape(title in "\\PC{1,120}") {
            let name = output_filename(&title, date());
            prop_assert!(name.starts_with("20240307_"));
            prop_assert!(name.ends_with(".md"));

            let slug = &name["20240307_".len()..name.len() - ".md".len()];
            prop_assert!(!slug.is_empty());
            prop_assert!(slug.chars().count() <= 50);
            prop_assert_eq!(output_filename(&title, date()), name.clone());
        }
    }
}
