//! Application state

use anyhow::Context;
use autoblog_core::Config;
use autoblog_generator::{ArticleClient, OpenAiProvider};
use std::path::{Path, PathBuf};

/// Everything a run needs before titles are collected
pub struct AppState {
    /// Validated configuration
    pub config: Config,
    /// Provider client built from the configuration and environment
    pub client: ArticleClient<OpenAiProvider>,
    /// Output directory for generated articles
    pub output_dir: PathBuf,
}

impl AppState {
    /// Load configuration and build the provider client
    ///
    /// Fails before any network activity when the API key is missing.
    pub fn new(config_path: &Path, output_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        let provider = OpenAiProvider::from_env(&config.openai)?;
        let client = ArticleClient::from_config(provider, &config);

        Ok(Self {
            config,
            client,
            output_dir: output_dir.to_path_buf(),
        })
    }
}
