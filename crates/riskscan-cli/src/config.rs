//! Scan configuration

use riskscan_classifier::{
    ModelConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CHARS, DEFAULT_MIN_SEGMENT_CHARS,
    DEFAULT_USER_AGENT,
};
use riskscan_core::{Error, Subject};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Model endpoint, name, and retry policy
    #[serde(default)]
    pub model: ModelConfig,

    /// Page fetching and evidence extraction
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Pause after each successful subject (milliseconds)
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Destination CSV file
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Subjects to classify, in order
    #[serde(default = "default_subjects")]
    pub subjects: Vec<Subject>,
}

impl ScanConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(endpoint) = &cli.endpoint {
            config.model.endpoint = endpoint.clone();
        }

        if let Some(model) = &cli.model {
            config.model.model = model.clone();
        }

        if let Some(backend) = cli.backend {
            config.model.backend = backend;
        }

        if let Some(output) = &cli.output {
            config.output = output.clone();
        }

        if !cli.subjects.is_empty() {
            config.subjects = cli.subjects.clone();
        }

        // Switching backend without naming an endpoint keeps the new
        // backend's own default
        config.model.align_endpoint();

        Ok(config)
    }

    /// Reject settings that cannot produce a useful run
    pub fn validate(&self) -> riskscan_core::Result<()> {
        if self.model.endpoint.trim().is_empty() {
            return Err(Error::config("model endpoint must not be empty"));
        }
        if self.model.model.trim().is_empty() {
            return Err(Error::config("model name must not be empty"));
        }
        if self.fetch.max_chars == 0 {
            return Err(Error::config("fetch.max_chars must be greater than zero"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::config("output path must not be empty"));
        }
        Ok(())
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            fetch: FetchConfig::default(),
            pacing_ms: default_pacing_ms(),
            output: default_output(),
            subjects: default_subjects(),
        }
    }
}

/// Page fetch and extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Identifying User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// Evidence budget in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Shortest paragraph kept as evidence
    #[serde(default = "default_min_segment_chars")]
    pub min_segment_chars: usize,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_fetch_timeout_secs(),
            max_chars: default_max_chars(),
            min_segment_chars: default_min_segment_chars(),
        }
    }
}

fn default_pacing_ms() -> u64 {
    1000
}

fn default_output() -> PathBuf {
    PathBuf::from("ai_risk_dataset.csv")
}

fn default_subjects() -> Vec<Subject> {
    vec![
        Subject::new("Face ID", "https://en.wikipedia.org/wiki/Face_ID"),
        Subject::new("Clearview AI", "https://en.wikipedia.org/wiki/Clearview_AI"),
        Subject::new("Dining Services", "https://dining.iastate.edu/"),
        Subject::new("IBM Watson", "https://en.wikipedia.org/wiki/IBM_Watson"),
        Subject::new("Grocery delivery", "https://www.instacart.com/help"),
    ]
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_min_segment_chars() -> usize {
    DEFAULT_MIN_SEGMENT_CHARS
}
