//! Typed configuration
//!
//! A configuration file may set any subset of fields; everything missing
//! falls back to the defaults below. The file format follows the extension:
//! `.yaml`/`.yml` is YAML, anything else is JSON.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Placeholder substituted with the article title in prompt templates
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// Upper bound for `processing.max_threads`
pub const MAX_THREADS: usize = 1024;

/// Upper bound for `processing.retry_delay`, in seconds
pub const MAX_RETRY_DELAY_SECS: f64 = 3600.0;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Writing style and article shape
    pub prompt_settings: PromptSettings,
    /// Provider model and sampling settings
    pub openai: OpenAiSettings,
    /// Concurrency and retry behaviour
    pub processing: ProcessingSettings,
}

/// Writing style and article shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub style: String,
    pub stance: String,
    pub target_audience: String,
    pub article_length: ArticleLength,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            style: "polite and easy to read".to_string(),
            stance: "neutral".to_string(),
            target_audience: "general readers".to_string(),
            article_length: ArticleLength::default(),
        }
    }
}

/// Number of sections and their approximate size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleLength {
    pub sections: u32,
    pub words_per_section: u32,
}

impl Default for ArticleLength {
    fn default() -> Self {
        Self {
            sections: 3,
            words_per_section: 300,
        }
    }
}

/// Provider model and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Model identifier (default: o4-mini)
    pub model: String,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    /// Maximum output tokens per article
    pub max_tokens: u32,
    /// Endpoint override for OpenAI-compatible servers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            model: "o4-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            base_url: None,
        }
    }
}

/// Concurrency and retry behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Worker pool size
    pub max_threads: usize,
    /// Attempts per title, including the first
    pub retry_attempts: u32,
    /// Base backoff delay in seconds
    pub retry_delay: f64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            max_threads: 10,
            retry_attempts: 3,
            retry_delay: 1.0,
        }
    }
}

impl Config {
    /// Load configuration from `path`
    ///
    /// When the file does not exist it is created with the defaults, which
    /// are then returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config not found, writing defaults to {}", path.display());
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        debug!("Loading config: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::parse(&content, is_yaml(path)).map_err(|e| Error::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text (JSON, or YAML when `yaml` is set)
    pub fn parse(content: &str, yaml: bool) -> Result<Self> {
        let config = if yaml {
            serde_yaml::from_str(content)?
        } else {
            serde_json::from_str(content)?
        };
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.openai.model.trim().is_empty() {
            return invalid("openai.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return invalid("openai.temperature must be between 0.0 and 2.0");
        }
        if self.openai.max_tokens == 0 {
            return invalid("openai.max_tokens must be at least 1");
        }
        if !(1..=MAX_THREADS).contains(&self.processing.max_threads) {
            return invalid("processing.max_threads must be between 1 and 1024");
        }
        if self.processing.retry_attempts == 0 {
            return invalid("processing.retry_attempts must be at least 1");
        }
        if !(0.0..=MAX_RETRY_DELAY_SECS).contains(&self.processing.retry_delay) {
            return invalid("processing.retry_delay must be between 0 and 3600 seconds");
        }
        if self.prompt_settings.article_length.sections == 0 {
            return invalid("prompt_settings.article_length.sections must be at least 1");
        }

        Ok(())
    }

    /// Render the article prompt template
    ///
    /// The result still contains [`TITLE_PLACEHOLDER`]; substitute it per
    /// title with [`render_prompt`].
    pub fn prompt_template(&self) -> String {
        let settings = &self.prompt_settings;
        let length = settings.article_length;

        let mut outline = String::from("# Title\n");
        for i in 1..=length.sections {
            outline.push_str(&format!("## Heading {}\nContent...\n", i));
        }

        format!(
            "Write an article about the title below, following these settings.\n\n\
             Style and stance: {}, {}\n\
             Target audience: {}\n\
             Structure: {} headings, about {} words per section\n\n\
             Title: {}\n\n\
             Output Markdown with the following structure:\n{}",
            settings.style,
            settings.stance,
            settings.target_audience,
            length.sections,
            length.words_per_section,
            TITLE_PLACEHOLDER,
            outline.trim_end()
        )
    }
}

/// Substitute every title placeholder in `template`
pub fn render_prompt(template: &str, title: &str) -> String {
    template.replace(TITLE_PLACEHOLDER, title)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "yaml" | "yml"))
        .unwrap_or(false)
}
