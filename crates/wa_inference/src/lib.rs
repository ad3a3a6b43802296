use std::fmt;
use std::time::Duration;

pub mod models;
pub mod analysis;
pub mod generation;

pub const DEFAULT_PROVIDER: &str = "anthropic";
pub const DEFAULT_MODEL_NAME: &str = "claude-sonnet-4-5";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Settings for the text generation provider.
#[derive(Clone)]
pub struct Config {
    pub provider: String,
    pub api_key: Option<String>,
    pub model_name: String,
    pub base_url: String,
    /// Upper bound for one model call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

pub use analysis::StyleAnalyzer;
pub use generation::{ArticleGenerator, ArticleLength};
pub use models::create_model;
