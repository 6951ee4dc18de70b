//! Instruction Composer: derives the full message sequence for one Responder call.
//!
//! The result is never stored. It is rebuilt from the template, the current keyword
//! set and the whole turn history on every turn, so a keyword change applies to the
//! next turn without rewriting history. History is never windowed or summarized.

use crate::interview::prompts::INTERVIEWER_PERSONA_V1;
use crate::keywords::KeywordSet;
use crate::llm_client::Message;
use crate::models::session::{Speaker, Turn};

const KEYWORDS_PLACEHOLDER: &str = "{keywords}";

/// A static, versioned persona/rubric prompt with a single `{keywords}` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaTemplate {
    pub version: &'static str,
    body: &'static str,
}

/// The interviewer persona in use.
pub const INTERVIEWER_PERSONA: PersonaTemplate =
    PersonaTemplate::new("interviewer-v1", INTERVIEWER_PERSONA_V1);

impl PersonaTemplate {
    pub const fn new(version: &'static str, body: &'static str) -> Self {
        Self { version, body }
    }

    /// Substitutes the comma-joined keyword list. No other processing happens.
    pub fn render(&self, keywords: &KeywordSet) -> String {
        self.body.replace(KEYWORDS_PLACEHOLDER, &keywords.joined())
    }
}

/// Builds the ordered message sequence: one system message, then every turn in
/// the order it was appended (`Human` -> user, `Assistant` -> assistant).
pub fn compose(template: &PersonaTemplate, keywords: &KeywordSet, history: &[Turn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(template.render(keywords)));
    messages.extend(history.iter().map(|turn| match turn.speaker {
        Speaker::Human => Message::user(turn.text.clone()),
        Speaker::Assistant => Message::assistant(turn.text.clone()),
    }));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::MAX_CANDIDATES;
    use crate::llm_client::Role;

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::normalized(words, MAX_CANDIDATES)
    }

    #[test]
    fn test_empty_history_yields_only_system_message() {
        let messages = compose(&INTERVIEWER_PERSONA, &keywords(&["rust"]), &[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::System);
    }

    #[test]
    fn test_n_turns_yield_n_plus_one_messages_in_order() {
        let history = vec![
            Turn::human("Hi, I'm ready"),
            Turn::assistant("Welcome! Please introduce yourself."),
            Turn::human("I'm a backend engineer."),
            Turn::assistant("Tell me about a system you built."),
        ];
        let messages = compose(&INTERVIEWER_PERSONA, &keywords(&["python"]), &history);

        assert_eq!(messages.len(), history.len() + 1);
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        for (message, turn) in messages[1..].iter().zip(&history) {
            assert_eq!(message.content, turn.text);
        }
    }

    #[test]
    fn test_keywords_are_interpolated() {
        let messages = compose(&INTERVIEWER_PERSONA, &keywords(&["Python", "Docker"]), &[]);
        assert!(messages[0]
            .content
            .contains("Resume Keywords: python, docker"));
        assert!(!messages[0].content.contains(KEYWORDS_PLACEHOLDER));
    }

    #[test]
    fn test_render_is_pure_substitution() {
        let template = PersonaTemplate::new("test", "Topics: {keywords}.");
        assert_eq!(template.render(&keywords(&["go", "sql"])), "Topics: go, sql.");
        assert_eq!(template.render(&KeywordSet::fallback()), "Topics: general.");
    }

    #[test]
    fn test_persona_carries_rubric_worth_twenty_points() {
        let body = INTERVIEWER_PERSONA.render(&KeywordSet::fallback());
        let total: u32 = body
            .lines()
            .filter_map(|line| line.strip_prefix("- "))
            .filter_map(|line| line.split_once(" marks:"))
            .filter_map(|(points, _)| points.parse::<u32>().ok())
            .sum();
        assert_eq!(total, 20);
        assert!(body.contains("Score: X/20"));
        for line in [
            "Communication: x/3",
            "Technical correctness: x/5",
            "Depth & optimization: x/4",
            "Practical examples: x/3",
            "Edge cases & exceptions: x/3",
            "Complexity analysis: x/2",
        ] {
            assert!(body.contains(line), "missing rubric line: {line}");
        }
    }

    #[test]
    fn test_persona_has_single_placeholder() {
        assert_eq!(INTERVIEWER_PERSONA_V1.matches(KEYWORDS_PLACEHOLDER).count(), 1);
    }
}
