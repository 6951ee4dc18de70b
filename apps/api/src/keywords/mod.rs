// Resume keyword pipeline.
// Implements: noun-frequency extraction, Responder-backed curation, document text
// extraction, and the keyword endpoints. All LLM calls go through the Responder trait.

use std::collections::HashSet;

use serde::Serialize;

pub mod curator;
pub mod document;
pub mod extractor;
pub mod handlers;
pub mod prompts;

/// Keyword used when a session has nothing better to steer questions with.
pub const FALLBACK_KEYWORD: &str = "general";
/// Upper bound for a Responder-curated set.
pub const MAX_CURATED_KEYWORDS: usize = 10;
/// Upper bound for raw candidates and for caller-supplied sets.
pub const MAX_CANDIDATES: usize = 30;

/// Ordered, normalized keyword list attached to a session.
///
/// Invariants: every entry is trimmed, lowercase and non-empty; no two entries
/// are equal (so no case-insensitive duplicates); order is first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Builds a set from untrusted input: trim, lowercase, drop empties,
    /// drop repeats, and stop after `cap` entries.
    pub fn normalized<I, S>(raw: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for item in raw {
            if keywords.len() >= cap {
                break;
            }
            let keyword = item.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                continue;
            }
            if seen.insert(keyword.clone()) {
                keywords.push(keyword);
            }
        }

        Self(keywords)
    }

    /// The singleton `["general"]` set.
    pub fn fallback() -> Self {
        Self(vec![FALLBACK_KEYWORD.to_string()])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Comma-separated rendering used in prompts.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    #[allow(dead_code)]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
