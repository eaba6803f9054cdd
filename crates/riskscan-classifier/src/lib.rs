//! riskscan Classifier
//!
//! Turns a subject's web page into an AI-risk classification:
//! - Page fetching with a fixed identifying user agent
//! - Evidence extraction from raw markup into a bounded excerpt
//! - Chat backends for Ollama and OpenAI-compatible endpoints
//! - A model client that enforces the JSON output contract with bounded retry

pub mod backend;
pub mod client;
pub mod config;
pub mod contract;
pub mod extractor;
pub mod fetcher;

pub use backend::{build_backend, ChatBackend, OllamaBackend, OpenAiBackend};
pub use client::ModelClient;
pub use config::{BackendKind, ModelConfig, RetryPolicy};
pub use contract::{build_request, parse_classification, system_prompt};
pub use extractor::{EvidenceExtractor, DEFAULT_MAX_CHARS, DEFAULT_MIN_SEGMENT_CHARS};
pub use fetcher::{HttpFetcher, PageFetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_USER_AGENT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::ChatBackend;
    pub use crate::client::ModelClient;
    pub use crate::config::{ModelConfig, RetryPolicy};
    pub use crate::extractor::EvidenceExtractor;
    pub use crate::fetcher::PageFetcher;
}
