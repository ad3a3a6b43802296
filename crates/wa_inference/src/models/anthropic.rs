use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use wa_core::{CompletionRequest, Error, Result, TextModel};

const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const ERROR_PREVIEW_CHARS: usize = 512;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client.
pub struct AnthropicModel {
    client: Client,
    api_key: String,
    model_name: String,
    endpoint: Url,
}

impl fmt::Debug for AnthropicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl AnthropicModel {
    pub fn new(
        api_key: String,
        model_name: String,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let endpoint = format!("{}/v1/messages", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            Error::Configuration(format!("Invalid model API URL '{}': {}", base_url, e))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            model_name,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn truncate_for_preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Joins the text blocks of a reply. A reply without any text is an error.
fn reply_text(response: MessagesResponse) -> Result<String> {
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(Error::Inference("model returned no text content".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl TextModel for AnthropicModel {
    fn name(&self) -> &str {
        "Anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model_name,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        tracing::debug!(
            "Sending {} prompt chars to {} ({})",
            request.prompt.chars().count(),
            self.endpoint,
            self.model_name
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Inference(format!(
                "HTTP {}: {}",
                status,
                truncate_for_preview(&response_text, ERROR_PREVIEW_CHARS)
            )));
        }

        let parsed: MessagesResponse = serde_json::from_str(&response_text).map_err(|e| {
            Error::Inference(format!(
                "Invalid response from model API: {}. Raw: {}",
                e,
                truncate_for_preview(&response_text, ERROR_PREVIEW_CHARS)
            ))
        })?;

        reply_text(parsed)
    }
}
