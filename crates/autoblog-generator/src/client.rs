//! Article client: connectivity probe and generation with retries

use crate::prompts::{
    article_writer_system, EMPTY_RESPONSE_PLACEHOLDER, PROBE_MAX_TOKENS, PROBE_MESSAGE,
};
use crate::provider::{ChatMessage, CompletionRequest, TextProvider};
use autoblog_core::{render_prompt, Config, MAX_RETRY_DELAY_SECS};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Retry schedule for one title
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts including the first, at least 1
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles for each later one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Build from the processing section of a config
    ///
    /// The delay is clamped to `0..=MAX_RETRY_DELAY_SECS`; a NaN delay falls
    /// back to the default.
    pub fn from_config(config: &Config) -> Self {
        let processing = &config.processing;
        let seconds = processing.retry_delay.clamp(0.0, MAX_RETRY_DELAY_SECS);
        let base_delay = Duration::try_from_secs_f64(seconds);

        Self {
            max_attempts: processing.retry_attempts.max(1),
            base_delay: base_delay.unwrap_or(Self::default().base_delay),
        }
    }

    /// Wait after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`
    ///
    /// Equivalently, the wait before attempt k (k >= 2) is `base * 2^(k-2)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Generation settings sent with every article request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Output token cap
    pub max_tokens: u32,
    /// Sampling temperature, `None` to leave it to the provider
    pub temperature: Option<f32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: Some(0.7),
        }
    }
}

impl GenerationOptions {
    /// Build from the provider section of a config
    pub fn from_config(config: &Config) -> Self {
        let settings = &config.openai;
        Self {
            max_tokens: settings.max_tokens,
            temperature: supports_temperature(&settings.model).then_some(settings.temperature),
        }
    }
}

/// Reasoning-family models (`o1`, `o3-mini`, `o4-mini`, ...) reject a
/// temperature parameter.
fn supports_temperature(model: &str) -> bool {
    let mut chars = model.chars();
    !matches!(
        (chars.next(), chars.next()),
        (Some('o'), Some(c)) if c.is_ascii_digit()
    )
}

/// Single point of contact with the text provider
pub struct ArticleClient<P> {
    provider: P,
    retry: RetryPolicy,
    options: GenerationOptions,
}

impl<P: TextProvider> ArticleClient<P> {
    /// Wrap `provider` with default retry and generation settings
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            retry: RetryPolicy::default(),
            options: GenerationOptions::default(),
        }
    }

    /// Wrap `provider` with settings taken from `config`
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::new(provider)
            .with_retry(RetryPolicy::from_config(config))
            .with_options(GenerationOptions::from_config(config))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send a minimal request and report whether it produced content
    ///
    /// Errors are logged, never returned.
    pub async fn test_connection(&self) -> bool {
        info!("Testing provider connection (model: {})", self.provider.model_name());

        let request = CompletionRequest {
            messages: vec![ChatMessage::user(PROBE_MESSAGE)],
            max_tokens: PROBE_MAX_TOKENS,
            temperature: None,
        };

        match self.provider.complete(request).await {
            Ok(response) if response.content.as_deref().is_some_and(|c| !c.is_empty()) => {
                info!("Provider connection test succeeded");
                true
            }
            Ok(_) => {
                error!("Provider connection test failed: empty response");
                false
            }
            Err(e) => {
                error!(error_kind = e.kind(), "Provider connection test failed: {}", e);
                false
            }
        }
    }

    /// Generate an article for `title`
    ///
    /// Renders `prompt_template`, then tries up to `max_attempts` times with
    /// exponential backoff between attempts. Returns `None` once every
    /// attempt failed. An empty but successful response yields a fixed
    /// placeholder text.
    pub async fn generate_article(&self, prompt_template: &str, title: &str) -> Option<String> {
        let prompt = render_prompt(prompt_template, title);
        let max_attempts = self.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!(title, attempt, "Calling provider (attempt {})", attempt);

            let request = CompletionRequest {
                messages: vec![
                    ChatMessage::system(article_writer_system()),
                    ChatMessage::user(prompt.as_str()),
                ],
                max_tokens: self.options.max_tokens,
                temperature: self.options.temperature,
            };

            match self.provider.complete(request).await {
                Ok(response) => {
                    let content = response.content.as_deref().map(str::trim).unwrap_or("");
                    if content.is_empty() {
                        warn!(title, "Received empty response");
                        return Some(EMPTY_RESPONSE_PLACEHOLDER.to_string());
                    }
                    debug!(title, "Generated article ({} chars)", content.chars().count());
                    return Some(content.to_string());
                }
                Err(e) => {
                    warn!(
                        title,
                        status = "retrying",
                        attempt,
                        error_kind = e.kind(),
                        "Provider call failed (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        e
                    );

                    if attempt < max_attempts {
                        let delay = self.retry.delay_after(attempt);
                        info!(title, "Retrying in {:.1}s", delay.as_secs_f64());
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        error!(title, "Max attempts reached, giving up");
        None
    }
}
