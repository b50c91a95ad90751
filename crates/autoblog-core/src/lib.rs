//! # autoblog-core
//!
//! Core library for autoblog.
//!
//! ## Features
//!
//! - Validated article titles and per-batch de-duplication
//! - Typed configuration with defaults, loaded from JSON or YAML
//! - Prompt template rendering
//! - Markdown sanitizing, title slugs and dated output files
//!
//! ## Example
//!
//! ```no_run
//! use autoblog_core::{ArticleWriter, Config, TitleSet};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!
//!     let mut titles = TitleSet::new();
//!     titles.insert("Getting started with Rust")?;
//!
//!     let writer = ArticleWriter::prepare("./output")?;
//!     for title in titles.iter() {
//!         let path = writer.write(title, "# Getting started\n\nHello").await?;
//!         println!("{}", path.display());
//!     }
//!
//!     println!("model: {}", config.openai.model);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;
pub mod writer;

// Re-exports for convenience
pub use config::{
    render_prompt, ArticleLength, Config, OpenAiSettings, ProcessingSettings, PromptSettings,
    MAX_RETRY_DELAY_SECS, MAX_THREADS, TITLE_PLACEHOLDER,
};
pub use error::{Error, Result};
pub use types::{Title, TitleError, TitleSet, FORBIDDEN_TITLE_CHARS, MAX_TITLE_CHARS};
pub use writer::{output_filename, sanitize_markdown, title_slug, ArticleWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
