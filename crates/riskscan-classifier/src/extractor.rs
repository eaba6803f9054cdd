//! Evidence extraction from raw page markup
//!
//! Best-effort and lossy: only paragraph text is kept, and only paragraphs
//! long enough to look like prose rather than navigation chrome.

use regex::Regex;
use riskscan_core::{Error, Evidence, Result};

/// Default character budget for one evidence excerpt
pub const DEFAULT_MAX_CHARS: usize = 1200;

/// Paragraphs shorter than this are treated as boilerplate
pub const DEFAULT_MIN_SEGMENT_CHARS: usize = 80;

/// Entities decoded after tag stripping, in order. `&amp;` goes first, so
/// `&amp;quot;` ends up as a plain quote. Angle-bracket entities are left
/// encoded so decoding never reintroduces markup.
const ENTITIES: [(&str, &str); 3] = [("&amp;", "&"), ("&quot;", "\""), ("&nbsp;", " ")];

/// Turns raw HTML into a bounded plain-text excerpt
#[derive(Debug, Clone)]
pub struct EvidenceExtractor {
    paragraph_regex: Regex,
    citation_regex: Regex,
    tag_regex: Regex,
    whitespace_regex: Regex,
    min_segment_chars: usize,
}

impl EvidenceExtractor {
    /// Create a new extractor with the default segment threshold
    pub fn new() -> Result<Self> {
        Ok(Self {
            paragraph_regex: Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>")
                .map_err(|e| Error::config(format!("Failed to compile paragraph regex: {}", e)))?,
            citation_regex: Regex::new(r"\[\d+\]")
                .map_err(|e| Error::config(format!("Failed to compile citation regex: {}", e)))?,
            tag_regex: Regex::new(r"<[^>]+>")
                .map_err(|e| Error::config(format!("Failed to compile tag regex: {}", e)))?,
            whitespace_regex: Regex::new(r"\s+")
                .map_err(|e| Error::config(format!("Failed to compile whitespace regex: {}", e)))?,
            min_segment_chars: DEFAULT_MIN_SEGMENT_CHARS,
        })
    }

    /// Override the minimum paragraph length
    pub fn with_min_segment_chars(mut self, min_segment_chars: usize) -> Self {
        self.min_segment_chars = min_segment_chars;
        self
    }

    /// Extract at most `max_chars` characters of paragraph text.
    ///
    /// Never fails: markup without paragraphs yields empty evidence.
    pub fn extract(&self, html: &str, max_chars: usize) -> Evidence {
        let mut kept: Vec<String> = Vec::new();
        let mut total = 0usize;

        for caps in self.paragraph_regex.captures_iter(html) {
            let Some(inner) = caps.get(1) else {
                continue;
            };

            let segment = self.clean_segment(inner.as_str());
            let len = segment.chars().count();
            if len > 0 && len >= self.min_segment_chars {
                kept.push(segment);
                total += len;
            }

            if total > max_chars {
                break;
            }
        }

        let joined = kept.join(" ");
        let truncated: String = joined.chars().take(max_chars).collect();
        Evidence::new(truncated.trim_end())
    }

    fn clean_segment(&self, raw: &str) -> String {
        let text = self.citation_regex.replace_all(raw, "");
        let text = self.tag_regex.replace_all(&text, "");
        let text = decode_entities(&text);
        self.whitespace_regex
            .replace_all(&text, " ")
            .trim()
            .to_string()
    }
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}
