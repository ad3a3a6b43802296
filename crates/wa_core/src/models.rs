use std::fmt;
use async_trait::async_trait;
use crate::Result;

/// A single-prompt request to a text generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
pub trait TextModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send the prompt and return the model's text reply as-is.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
