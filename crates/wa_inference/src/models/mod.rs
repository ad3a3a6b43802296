use std::sync::Arc;
use wa_core::{Error, Result, TextModel};
use crate::Config;

pub mod anthropic;
pub mod dummy;

pub use anthropic::AnthropicModel;
pub use dummy::DummyModel;

/// Names accepted in [`Config::provider`].
pub const MODEL_PROVIDERS: &[&str] = &["anthropic", "dummy"];

/// Build the configured model.
///
/// `Ok(None)` means the provider is known but has no credential. Callers
/// decide what that means for them: analysis degrades, generation refuses.
pub fn create_model(config: &Config) -> Result<Option<Arc<dyn TextModel>>> {
    match config.provider.as_str() {
        "anthropic" => match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(api_key) => {
                let model = AnthropicModel::new(
                    api_key.to_string(),
                    config.model_name.clone(),
                    &config.base_url,
                    config.request_timeout,
                )?;
                Ok(Some(Arc::new(model)))
            }
            None => {
                tracing::warn!("⚠️ ANTHROPIC_API_KEY is not set; analysis will skip the model and generation is disabled");
                Ok(None)
            }
        },
        "dummy" => Ok(Some(Arc::new(DummyModel::new()))),
        other => Err(Error::Configuration(format!(
            "Unknown model provider '{}'. Available providers: {}",
            other,
            MODEL_PROVIDERS.join(", ")
        ))),
    }
}
