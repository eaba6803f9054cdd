//! Result rows

use chrono::{DateTime, SecondsFormat, Utc};
use riskscan_core::{ClassificationResult, Evidence, Subject};
use serde::{Deserialize, Serialize};

/// Column order of the result store
pub const RECORD_FIELDS: [&str; 7] = [
    "timestamp_utc",
    "title",
    "source_url",
    "scraped_text",
    "uses_ai",
    "risk_level",
    "top_risks",
];

/// One classified subject, flattened for tabular storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// RFC 3339 UTC timestamp with a `Z` suffix
    pub timestamp_utc: String,

    /// Subject display name
    pub title: String,

    /// Subject page URL
    pub source_url: String,

    /// Evidence text sent to the model
    pub scraped_text: String,

    /// Written as lowercase `true`/`false`
    pub uses_ai: bool,

    pub risk_level: String,

    /// `top_risks` joined with `|`
    pub top_risks: String,
}

impl ResultRecord {
    /// Build a record stamped with the current time
    pub fn new(subject: &Subject, evidence: Evidence, result: &ClassificationResult) -> Self {
        Self::at(Utc::now(), subject, evidence, result)
    }

    /// Build a record with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        subject: &Subject,
        evidence: Evidence,
        result: &ClassificationResult,
    ) -> Self {
        Self {
            timestamp_utc: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            title: subject.name.clone(),
            source_url: subject.url.clone(),
            scraped_text: evidence.into_inner(),
            uses_ai: result.uses_ai,
            risk_level: result.risk_level.clone(),
            top_risks: result.joined_risks(),
        }
    }

    /// Field values in [`RECORD_FIELDS`] order
    pub fn to_row(&self) -> [String; 7] {
        [
            self.timestamp_utc.clone(),
            self.title.clone(),
            self.source_url.clone(),
            self.scraped_text.clone(),
            self.uses_ai.to_string(),
            self.risk_level.clone(),
            self.top_risks.clone(),
        ]
    }
}
