//! Configuration for the model client and its backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which wire protocol the model endpoint speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local Ollama `/api/chat`
    #[default]
    Ollama,
    /// OpenAI-compatible `/chat/completions`
    OpenAi,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown backend '{}', expected ollama or openai", other)),
        }
    }
}

impl BackendKind {
    /// Endpoint used when none is configured
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434/api/chat",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => f.write_str("ollama"),
            Self::OpenAi => f.write_str("openai"),
        }
    }
}

/// Bounded fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay_ms: delay.as_millis() as u64,
        }
    }

    /// Same retry count, no waiting between attempts
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Model endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend protocol
    #[serde(default)]
    pub backend: BackendKind,

    /// Full chat URL for Ollama, base URL for OpenAI-compatible servers
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name passed in every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key (OpenAI backend only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transport and contract failures
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Replace an endpoint that is still another backend's default with
    /// this backend's own default
    pub fn align_endpoint(&mut self) {
        let stale = [BackendKind::Ollama, BackendKind::OpenAi]
            .into_iter()
            .any(|kind| kind != self.backend && self.endpoint == kind.default_endpoint());
        if stale {
            self.endpoint = self.backend.default_endpoint().to_string();
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_model_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

fn default_endpoint() -> String {
    BackendKind::default().default_endpoint().to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.backend, BackendKind::Ollama);
        assert_eq!(config.endpoint, "http://localhost:11434/api/chat");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.retry.max_attempts(), 3);
        assert_eq!(config.retry.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
backend: openai
endpoint: https://api.openai.com/v1
model: gpt-4.1
retry:
  max_retries: 4
"#;
        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend, BackendKind::OpenAi);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.delay_ms, 2000);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_align_endpoint_follows_backend() {
        let mut config = ModelConfig {
            backend: BackendKind::OpenAi,
            ..Default::default()
        };
        config.align_endpoint();
        assert_eq!(config.endpoint, "https://api.openai.com/v1");

        config.backend = BackendKind::Ollama;
        config.align_endpoint();
        assert_eq!(config.endpoint, "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_align_endpoint_keeps_custom_url() {
        let mut config = ModelConfig {
            backend: BackendKind::OpenAi,
            endpoint: "http://vllm.internal:8000/v1".to_string(),
            ..Default::default()
        };
        config.align_endpoint();
        assert_eq!(config.endpoint, "http://vllm.internal:8000/v1");
    }

    #[test]
    fn test_yaml_backend_without_endpoint() {
        let mut config: ModelConfig = serde_yaml::from_str("backend: openai\n").unwrap();
        config.align_endpoint();
        assert_eq!(config.endpoint, "https://api.openai.com/v1");
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("OpenAI".parse::<BackendKind>(), Ok(BackendKind::OpenAi));
        assert!("bedrock".parse::<BackendKind>().is_err());
    }
}
