//! # autoblog-generator
//!
//! LLM-powered parallel article generation for autoblog.
//!
//! ## Features
//!
//! - OpenAI-compatible text provider behind the [`TextProvider`] trait
//! - Connectivity probe and per-title generation with exponential backoff
//! - Bounded worker pool fanning a title list out to concurrent tasks
//! - Per-title outcomes collected into a [`BatchReport`]
//!
//! ## Example
//!
//! ```no_run
//! use autoblog_core::{Config, TitleSet};
//! use autoblog_generator::{ArticleClient, ArticleGenerator, OpenAiProvider};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let provider = OpenAiProvider::from_env(&config.openai)?;
//!     let client = ArticleClient::from_config(provider, &config);
//!     let generator = ArticleGenerator::from_config(client, &config);
//!
//!     let mut titles = TitleSet::new();
//!     titles.insert("Getting started with Rust")?;
//!
//!     let report = generator.generate_all(titles.as_slice(), "./output").await?;
//!     println!("{} succeeded, {} failed", report.succeeded(), report.failed());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod provider;
pub mod report;

// Re-exports
pub use client::{ArticleClient, GenerationOptions, RetryPolicy};
pub use error::{Error, ProviderError, Result};
pub use generator::{ArticleGenerator, ProgressCallback, CANCELLED_ERROR, NO_CONTENT_ERROR};
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, MessageRole, OpenAiProvider, TextProvider,
};
pub use report::{BatchReport, GenerationResult, ReportEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
