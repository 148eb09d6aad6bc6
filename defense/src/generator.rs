//! Text generation for takedown notices.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GenerationError;

/// Produces free text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

/// JSON-over-HTTP generator: `POST {endpoint}` with `{"model", "prompt"}`,
/// answered by `{"text"}`. Sends the API key as a bearer token when set.
#[derive(Clone, Debug)]
pub struct HttpTextGenerator {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
            });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::Transport(e.to_string())
            }
        })?;
        let status = resp.status();
        debug!(endpoint = %self.endpoint, %status, "text generation response");
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }
        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        Ok(body.text)
    }
}

/// Nullable generator: answers from a script, then with a fixed reply.
///
/// Each scripted entry is used once, in order. When the script is exhausted
/// the fallback reply is returned; with no fallback the call fails.
#[derive(Default)]
pub struct NullTextGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
    delay: Duration,
}

impl NullTextGenerator {
    /// Always answers `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            fallback: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Fails every call, the first time with `error`.
    pub fn failing(error: GenerationError) -> Self {
        let gen = Self::default();
        gen.push(Err(error));
        gen
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push(&self, answer: Result<String, GenerationError>) {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(answer);
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl TextGenerator for NullTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();
        match (scripted, &self.fallback) {
            (Some(answer), _) => answer,
            (None, Some(reply)) => Ok(reply.clone()),
            (None, None) => Err(GenerationError::Transport("null generator has no reply".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_then_fallback() {
        let gen = NullTextGenerator::replying("steady");
        gen.push(Err(GenerationError::Timeout));
        gen.push(Ok("first".into()));
        assert_eq!(gen.generate("a").await, Err(GenerationError::Timeout));
        assert_eq!(gen.generate("b").await, Ok("first".into()));
        assert_eq!(gen.generate("c").await, Ok("steady".into()));
        assert_eq!(gen.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let gen = HttpTextGenerator::new(
            "http://127.0.0.1:9/generate",
            "notice-writer",
            None,
            Duration::from_millis(500),
        );
        assert!(matches!(
            gen.generate("hi").await,
            Err(GenerationError::Transport(_) | GenerationError::Timeout)
        ));
    }
}
