//! Noun-frequency extractor: turns raw resume text into ranked keyword candidates.
//!
//! Noun detection sits behind the `NounDetector` trait so the linguistic model can be
//! swapped without touching the ranking. Ranking is deterministic: identical text
//! always yields an identical candidate list.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::MAX_CANDIDATES;

/// Resume boilerplate and filler that never makes a useful interview topic.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "skills", "experience", "contact", "page", "resume", "name", "email",
        "address", "phone", "summary", "curriculum", "vitae", "linkedin", "github", "www",
        "com", "section", "education", "projects", "work", "organization", "institute",
        "also", "with", "this", "that", "from", "for", "are", "you", "your", "has", "have",
    ]
    .into_iter()
    .collect()
});

/// Closed-class words (determiners, pronouns, prepositions, conjunctions, auxiliaries)
/// and frequent resume verbs. None of these can head a noun phrase.
static FUNCTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // determiners / quantifiers
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any",
        "all", "both", "few", "many", "more", "most", "other", "such", "own", "same", "no",
        // pronouns
        "i", "me", "my", "mine", "we", "us", "our", "you", "your", "he", "him", "his", "she",
        "her", "it", "its", "they", "them", "their", "who", "whom", "whose", "which", "what",
        // prepositions
        "about", "above", "across", "after", "against", "along", "among", "around", "at",
        "before", "behind", "below", "between", "beyond", "by", "during", "for", "from", "in",
        "inside", "into", "like", "near", "of", "off", "on", "onto", "out", "over", "per",
        "since", "through", "throughout", "to", "toward", "towards", "under", "until", "up",
        "upon", "via", "with", "within", "without",
        // conjunctions
        "and", "but", "or", "nor", "so", "yet", "if", "then", "than", "because", "while",
        "when", "where", "whereas", "although", "though", "unless", "whether",
        // auxiliaries / modals
        "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have",
        "has", "had", "having", "can", "could", "will", "would", "shall", "should", "may",
        "might", "must",
        // frequent resume verbs and adverbs
        "build", "builds", "building", "create", "creates", "develop", "develops", "design",
        "designs", "lead", "leads", "manage", "manages", "use", "uses", "using", "including",
        "improve", "improves", "implement", "implements", "work", "works", "working", "also",
        "very", "well", "just", "only", "not", "etc", "e.g", "i.e",
    ]
    .into_iter()
    .collect()
});

/// Adverb endings; words carrying them are dropped by the heuristic detector.
const ADVERB_SUFFIXES: &[&str] = &["ally", "ively", "ously", "fully", "edly", "ingly"];

/// Word-like tokens, keeping technical spellings intact: `c++`, `c#`, `node.js`, `ci/cd`.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9]*(?:[+#]+|(?:[./-][A-Za-z0-9]+)*)")
        .expect("token regex is valid")
});

/// Linguistic analyzer capability: returns the nouns found in `text`, in order of
/// appearance, repeats included. Must be a pure function of its input.
pub trait NounDetector: Send + Sync {
    fn nouns(&self, text: &str) -> Vec<String>;
}

/// Rule-based noun detector. Tokens must start with a letter (so numbers, dates and
/// punctuation never surface), and closed-class words, past-tense verbs and adverbs
/// are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicNounDetector;

impl NounDetector for HeuristicNounDetector {
    fn nouns(&self, text: &str) -> Vec<String> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| is_probable_noun(token))
            .map(String::from)
            .collect()
    }
}

fn is_probable_noun(token: &str) -> bool {
    let lower = token.to_lowercase();
    if FUNCTION_WORDS.contains(lower.as_str()) {
        return false;
    }
    // Past-tense verbs: "developed", "migrated". Keeps "speed", "feed".
    if lower.len() > 4 && lower.ends_with("ed") && !lower.ends_with("eed") {
        return false;
    }
    !ADVERB_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Ranks candidate keywords in `text`.
///
/// Nouns are lowercased, tokens of two characters or fewer and stop words are dropped,
/// the rest are counted and sorted by descending count. The sort is stable, so ties
/// keep first-occurrence order. At most `MAX_CANDIDATES` entries are returned.
pub fn extract_candidates(text: &str, detector: &dyn NounDetector) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for noun in detector.nouns(text) {
        let noun = noun.trim().to_lowercase();
        if noun.chars().count() <= 2 || STOP_WORDS.contains(noun.as_str()) {
            continue;
        }
        match positions.get(&noun) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(noun.clone(), counts.len());
                counts.push((noun, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|(noun, _)| noun)
        .collect()
}
