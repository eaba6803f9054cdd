//! Model client with bounded retry
//!
//! Transport failures, error statuses and unparseable output all consume one
//! attempt. Other errors (configuration, I/O) are returned immediately.

use crate::backend::ChatBackend;
use crate::config::{ModelConfig, RetryPolicy};
use crate::contract::{build_request, parse_classification};
use riskscan_core::{ChatRequest, ClassificationResult, Error, Evidence, Result, Subject};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Classifies evidence through a chat backend
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn ChatBackend>,
    model: String,
    retry: RetryPolicy,
}

impl ModelClient {
    /// Create a client with an explicit model name and retry policy
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        model: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            retry,
        }
    }

    /// Create a client from the model section of the configuration
    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ModelConfig) -> Self {
        Self::new(backend, config.model.clone(), config.retry)
    }

    /// Classify one subject's evidence
    pub async fn classify(
        &self,
        subject: &Subject,
        evidence: &Evidence,
    ) -> Result<ClassificationResult> {
        let request = build_request(&self.model, subject, evidence);
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                subject = %subject.name,
                backend = self.backend.name(),
                attempt,
                max_attempts,
                "sending classification request"
            );

            let error = match self.attempt(&request).await {
                Ok(result) => {
                    info!(
                        subject = %subject.name,
                        attempt,
                        uses_ai = result.uses_ai,
                        risk_level = %result.risk_level,
                        "classification received"
                    );
                    return Ok(result);
                }
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt >= max_attempts {
                return Err(Error::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            warn!(
                subject = %subject.name,
                attempt,
                max_attempts,
                error = %error,
                "classification attempt failed, retrying"
            );

            let delay = self.retry.delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<ClassificationResult> {
        let content = self.backend.chat(request).await?;
        parse_classification(&content)
    }
}
