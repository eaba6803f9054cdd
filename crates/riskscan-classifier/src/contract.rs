//! The JSON output contract: prompt construction and lenient parsing

use riskscan_core::{
    ChatMessage, ChatRequest, ClassificationResult, Error, Evidence, Result, RiskCategory,
    RiskLevel, Subject,
};
use serde_json::{Map, Value};

/// System instruction describing the output schema and vocabularies
pub fn system_prompt() -> String {
    let levels = RiskLevel::ALL
        .iter()
        .map(|l| format!("\"{}\"", l))
        .collect::<Vec<_>>()
        .join(" | ");
    let categories = RiskCategory::ALL
        .iter()
        .map(RiskCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Return ONLY valid JSON (no markdown, no extra text).
Schema:
{{
  "uses_ai": boolean,
  "risk_level": {levels},
  "top_risks": [string, string, string]
}}
Rules:
- If the description clearly does NOT involve AI, set:
  uses_ai=false, risk_level="low", top_risks=[]
- top_risks must be 0 to 3 items max, chosen ONLY from:
  {categories}
"#
    )
}

/// Per-subject user message with identity, locator, and evidence
pub fn user_message(subject: &Subject, evidence: &Evidence) -> String {
    format!(
        "SYSTEM NAME: {}\nSOURCE URL: {}\n\nEVIDENCE TEXT (scraped):\n{}\n\nTask: Fill the JSON schema for basic AI risk classification.\n",
        subject.name, subject.url, evidence
    )
}

/// Build the two-message classification conversation
pub fn build_request(model: &str, subject: &Subject, evidence: &Evidence) -> ChatRequest {
    ChatRequest::new(
        model,
        vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(user_message(subject, evidence)),
        ],
    )
}

/// Parse model output into a result.
///
/// The content must be a JSON object; anything else is a contract
/// violation. Inside the object every field is optional and loosely typed:
/// missing `uses_ai` reads as false, missing `risk_level` as empty, missing
/// `top_risks` as empty.
pub fn parse_classification(content: &str) -> Result<ClassificationResult> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| Error::contract(format!("model output is not valid JSON: {}", e)))?;

    let Value::Object(fields) = value else {
        return Err(Error::contract(format!(
            "model output is JSON but not an object: {}",
            truncate_for_log(content)
        )));
    };

    Ok(ClassificationResult {
        uses_ai: read_bool(&fields, "uses_ai"),
        risk_level: read_string(&fields, "risk_level"),
        top_risks: read_list(&fields, "top_risks"),
    })
}

fn read_bool(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn read_string(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn read_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn truncate_for_log(content: &str) -> String {
    const LIMIT: usize = 120;
    if content.chars().count() <= LIMIT {
        content.to_string()
    } else {
        format!("{}...", content.chars().take(LIMIT).collect::<String>())
    }
}
