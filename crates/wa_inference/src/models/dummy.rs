use std::fmt;
use std::sync::Mutex;
use wa_core::{CompletionRequest, Error, Result, TextModel};

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Reply(String),
    Fail(String),
}

/// Offline model. Echoes the start of the prompt unless told otherwise.
/// Scripted models (fixed reply or failure) remember every request they get;
/// the echo model keeps nothing, so it can back a long-running server.
pub struct DummyModel {
    behavior: Behavior,
    requests: Option<Mutex<Vec<CompletionRequest>>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("behavior", &self.behavior)
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Echo,
            requests: None,
        }
    }

    /// Always answer with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Always fail with an inference error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(reason.into()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            requests: Some(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far, oldest first. Always empty for the echo model.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .as_ref()
            .and_then(|requests| requests.lock().ok().map(|r| r.clone()))
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl TextModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let reply = match &self.behavior {
            // Take first 20 words of the prompt
            Behavior::Echo => Ok(request
                .prompt
                .split_whitespace()
                .take(20)
                .collect::<Vec<_>>()
                .join(" ")),
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(reason) => Err(Error::Inference(reason.clone())),
        };
        if let Some(Ok(mut requests)) = self.requests.as_ref().map(Mutex::lock) {
            requests.push(request);
        }
        reply
    }
}
