//! Fixed prompts sent alongside the configured article template

/// System prompt for article generation
pub fn article_writer_system() -> &'static str {
    "You are an excellent blog writer. Following the given title and settings, \
     write an article that is easy to read and useful to the reader."
}

/// User message for the connectivity probe
pub const PROBE_MESSAGE: &str = "Hello";

/// Output token cap for the connectivity probe
pub const PROBE_MAX_TOKENS: u32 = 10;

/// Body written when the provider answers with empty content
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "No response generated.";
