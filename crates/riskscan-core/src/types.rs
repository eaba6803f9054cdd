//! Core types for riskscan

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named system being evaluated, with the page that describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name, e.g. "Face ID"
    pub name: String,

    /// Source page URL
    pub url: String,
}

impl Subject {
    /// Create a new subject
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    /// Parse `NAME=URL`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, url) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=URL, got '{}'", s))?;
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            return Err(format!("expected NAME=URL, got '{}'", s));
        }
        Ok(Self::new(name, url))
    }
}

/// Plain-text excerpt extracted from a subject's page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(String);

impl Evidence {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Non-streaming chat request sent to a model backend
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
        }
    }
}

/// Overall risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown risk level: {}", s))
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed vocabulary for `top_risks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Privacy,
    Bias,
    Safety,
    Security,
    Transparency,
    Health,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 6] = [
        Self::Privacy,
        Self::Bias,
        Self::Safety,
        Self::Security,
        Self::Transparency,
        Self::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Privacy => "privacy",
            Self::Bias => "bias",
            Self::Safety => "safety",
            Self::Security => "security",
            Self::Transparency => "transparency",
            Self::Health => "health",
        }
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cat| cat.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown risk category: {}", s))
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured answer returned by the model.
///
/// Values are stored exactly as the model produced them. The
/// `uses_ai == false` implies `low` with no risks rule is part of the prompt
/// and is not enforced here; use [`ClassificationResult::is_consistent`] to
/// inspect it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether the described system involves AI
    #[serde(default)]
    pub uses_ai: bool,

    /// Raw risk level, empty when the model omitted it
    #[serde(default)]
    pub risk_level: String,

    /// Raw risk labels in model order
    #[serde(default)]
    pub top_risks: Vec<String>,
}

impl ClassificationResult {
    /// Create a result from typed values
    pub fn new(uses_ai: bool, risk_level: RiskLevel, top_risks: &[RiskCategory]) -> Self {
        Self {
            uses_ai,
            risk_level: risk_level.to_string(),
            top_risks: top_risks.iter().map(ToString::to_string).collect(),
        }
    }

    /// Typed risk level, if the raw value is in the vocabulary
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_level.parse().ok()
    }

    /// Risk labels outside the closed vocabulary
    pub fn unknown_risks(&self) -> Vec<&str> {
        self.top_risks
            .iter()
            .map(String::as_str)
            .filter(|r| r.parse::<RiskCategory>().is_err())
            .collect()
    }

    /// `top_risks` flattened with `|`
    pub fn joined_risks(&self) -> String {
        self.top_risks.join("|")
    }

    /// Whether a non-AI result carries the low/no-risk shape the prompt asks for
    pub fn is_consistent(&self) -> bool {
        self.uses_ai || (self.risk_level() == Some(RiskLevel::Low) && self.top_risks.is_empty())
    }
}
