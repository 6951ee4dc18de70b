//! Keyword Curator: asks the Responder to pick the interview-relevant candidates and
//! parses its free-text reply into a `KeywordSet`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::keywords::prompts::CURATION_PROMPT_TEMPLATE;
use crate::keywords::{KeywordSet, MAX_CURATED_KEYWORDS};
use crate::llm_client::{LlmError, Message, Responder};

/// Characters stripped from both ends of every reply entry.
const WRAPPING_CHARS: &[char] = &['"', '\'', '`', '*', '•', '[', ']'];

pub struct KeywordCurator {
    responder: Arc<dyn Responder>,
}

impl KeywordCurator {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }

    /// Curates `candidates`, propagating Responder failures unchanged.
    ///
    /// An empty candidate list short-circuits to an empty set without a Responder call.
    pub async fn try_curate(&self, candidates: &[String]) -> Result<KeywordSet, LlmError> {
        if candidates.is_empty() {
            return Ok(KeywordSet::default());
        }

        let prompt = CURATION_PROMPT_TEMPLATE.replace("{candidates}", &candidates.join(", "));
        let reply = self.responder.predict(&[Message::user(prompt)]).await?;

        Ok(parse_keyword_reply(&reply))
    }

    /// Curates `candidates`, degrading to an empty set when the Responder fails or
    /// its reply has no usable entries. Consumers apply the `general` fallback.
    pub async fn curate(&self, candidates: &[String]) -> KeywordSet {
        match self.try_curate(candidates).await {
            Ok(keywords) if !keywords.is_empty() => {
                info!(
                    "Curated {} keywords from {} candidates",
                    keywords.len(),
                    candidates.len()
                );
                keywords
            }
            Ok(_) => {
                warn!(
                    "Keyword extraction degraded: curation of {} candidates produced no keywords",
                    candidates.len()
                );
                KeywordSet::default()
            }
            Err(e) => {
                warn!("Keyword extraction degraded: curation call failed: {e}");
                KeywordSet::default()
            }
        }
    }
}

/// Parses a Responder reply into a curated keyword set.
///
/// The reply format is not guaranteed, so parsing is permissive:
/// 1. split on commas and line breaks
/// 2. strip list markers (`-`, `1.`, `2)`) and wrapping quotes or emphasis
/// 3. trim, lowercase, drop empties and repeats
/// 4. keep the first `MAX_CURATED_KEYWORDS`
///
/// Anything that survives normalization is accepted as a keyword.
pub fn parse_keyword_reply(reply: &str) -> KeywordSet {
    let entries = reply
        .split(|c: char| c == ',' || c == '\n' || c == '\r')
        .map(clean_entry);
    KeywordSet::normalized(entries, MAX_CURATED_KEYWORDS)
}

fn clean_entry(entry: &str) -> &str {
    let entry = entry.trim();
    let entry = strip_list_marker(entry);
    entry.trim_matches(|c: char| c.is_whitespace() || WRAPPING_CHARS.contains(&c))
}

/// Removes a leading `- `, `1. ` or `2) ` marker.
fn strip_list_marker(entry: &str) -> &str {
    if let Some(rest) = entry.strip_prefix("- ") {
        return rest;
    }
    let digits = entry.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &entry[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }
    entry
}
