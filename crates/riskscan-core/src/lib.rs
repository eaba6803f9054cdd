//! riskscan Core
//!
//! Core types and error handling shared across riskscan components.
//!
//! This crate provides:
//! - Subjects, evidence, and chat request types
//! - The closed risk vocabularies and the classification result shape
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ChatMessage, ChatRequest, ClassificationResult, Evidence, RiskCategory, RiskLevel, Subject,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, Evidence, RiskCategory, RiskLevel, Subject};
}
