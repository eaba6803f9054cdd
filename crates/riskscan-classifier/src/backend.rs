//! Chat backends
//!
//! A backend sends one non-streaming conversation and returns the
//! assistant's raw message text. Interpreting that text is the client's job.

use crate::config::{BackendKind, ModelConfig};
use async_trait::async_trait;
use riskscan_core::{ChatRequest, Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Trait for model endpoints
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation and return the assistant message content
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Get the backend name
    fn name(&self) -> &str;
}

/// Build the backend described by `config`
pub fn build_backend(config: &ModelConfig) -> Result<Arc<dyn ChatBackend>> {
    match config.backend {
        BackendKind::Ollama => Ok(Arc::new(OllamaBackend::new(
            &config.endpoint,
            config.timeout(),
        )?)),
        BackendKind::OpenAi => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                Error::config(format!(
                    "environment variable {} must hold an API key for the openai backend",
                    config.api_key_env
                ))
            })?;
            Ok(Arc::new(OpenAiBackend::new(
                &config.endpoint,
                api_key,
                config.timeout(),
            )?))
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

/// Send the request and return the response text, logging error bodies
async fn post_json(request: reqwest::RequestBuilder, backend: &str) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::transport(format!("{}: {}", backend, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(backend, status = status.as_u16(), body = %body, "model endpoint returned an error");
        return Err(Error::http_status(status.as_u16(), body));
    }

    response
        .text()
        .await
        .map_err(|e| Error::transport(format!("{}: failed to read body: {}", backend, e)))
}

// =============================================================================
// Ollama
// =============================================================================

/// Ollama `/api/chat` backend
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    url: String,
}

impl OllamaBackend {
    /// Create a backend for the full chat URL, e.g. `http://localhost:11434/api/chat`
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        debug!(url = %self.url, model = %request.model, "posting chat request");

        let body = post_json(self.client.post(&self.url).json(request), self.name()).await?;
        parse_ollama_response(&body)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

fn parse_ollama_response(body: &str) -> Result<String> {
    let response: OllamaChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::contract(format!("unexpected ollama response: {}", e)))?;
    Ok(response.message.content.trim().to_string())
}

// =============================================================================
// OpenAI-compatible
// =============================================================================

/// OpenAI-compatible `/chat/completions` backend
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Create a backend for a base URL such as `https://api.openai.com/v1`
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        debug!(url = %self.url, model = %request.model, "posting chat completion");

        let builder = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request);
        let body = post_json(builder, self.name()).await?;
        parse_openai_response(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiCompletion {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

fn parse_openai_response(body: &str) -> Result<String> {
    let completion: OpenAiCompletion = serde_json::from_str(body)
        .map_err(|e| Error::contract(format!("unexpected openai response: {}", e)))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| Error::contract("openai response has no message content"))
}
