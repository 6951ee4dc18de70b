//! Turn Orchestrator: runs one interview turn end to end.
//!
//! Flow: validate -> take the session's turn slot -> resolve keywords (fallback
//! `general`) -> append the user turn -> compose -> Responder (with timeout) ->
//! append the reply.
//!
//! The user turn is stored before the Responder is called and is not rolled back
//! on failure. A retry therefore resends it as context ahead of the new message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::composer::{compose, PersonaTemplate, INTERVIEWER_PERSONA};
use crate::interview::session_store::SessionStore;
use crate::keywords::KeywordSet;
use crate::llm_client::{LlmError, Responder};
use crate::models::session::Turn;

pub struct Interviewer {
    sessions: SessionStore,
    responder: Arc<dyn Responder>,
    template: PersonaTemplate,
    responder_timeout: Duration,
}

impl Interviewer {
    pub fn new(
        sessions: SessionStore,
        responder: Arc<dyn Responder>,
        responder_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            responder,
            template: INTERVIEWER_PERSONA,
            responder_timeout,
        }
    }

    /// Handles one user message and returns the interviewer's reply.
    ///
    /// Errors:
    /// - `AppError::Validation` when `session_id` or `user_text` is blank.
    /// - `AppError::Responder` when the backend fails, times out, or replies with
    ///   nothing. No assistant turn is stored in that case.
    pub async fn handle_turn(&self, session_id: &str, user_text: &str) -> Result<String, AppError> {
        if session_id.trim().is_empty() || user_text.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing session ID or message".to_string(),
            ));
        }

        let span = info_span!("turn", session_id, turn_id = %Uuid::new_v4());
        self.run_turn(session_id, user_text).instrument(span).await
    }

    async fn run_turn(&self, session_id: &str, user_text: &str) -> Result<String, AppError> {
        let session = self.sessions.get_or_create(session_id);
        let _slot = session.lock_turns().await;

        let mut keywords = session.keywords();
        if keywords.is_empty() {
            warn!("No keywords for session {session_id}; using fallback [\"general\"]");
            keywords = KeywordSet::fallback();
        }

        session.append_turn(Turn::human(user_text));

        let messages = compose(&self.template, &keywords, &session.history());
        debug!(
            "Composed {} messages (persona {})",
            messages.len(),
            self.template.version
        );

        let reply = match tokio::time::timeout(
            self.responder_timeout,
            self.responder.predict(&messages),
        )
        .await
        {
            Ok(Ok(reply)) if !reply.trim().is_empty() => reply,
            Ok(Ok(_)) => return Err(AppError::Responder(LlmError::EmptyContent)),
            Ok(Err(e)) => return Err(AppError::Responder(e)),
            Err(_) => {
                return Err(AppError::Responder(LlmError::Timeout(
                    self.responder_timeout,
                )))
            }
        };

        session.append_turn(Turn::assistant(reply.clone()));
        info!("Turn completed ({} turns in history)", session.history().len());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::curator::KeywordCurator;
    use crate::llm_client::testing::ScriptedResponder;
    use crate::llm_client::{LlmError, Message, Role};
    use crate::models::session::Speaker;
    use async_trait::async_trait;

    const TTL: Duration = Duration::from_secs(3600);
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn interviewer(responder: Arc<ScriptedResponder>) -> (Interviewer, SessionStore) {
        let store = SessionStore::new(TTL);
        (Interviewer::new(store.clone(), responder, TIMEOUT), store)
    }

    fn roles(messages: &[Message]) -> Vec<Role> {
        messages.iter().map(|m| m.role).collect()
    }

    #[tokio::test]
    async fn test_rejects_blank_inputs() {
        let responder = Arc::new(ScriptedResponder::new());
        let (interviewer, store) = interviewer(responder.clone());

        for (id, text) in [("", "hi"), ("s1", ""), ("  ", "hi"), ("s1", " \n ")] {
            let err = interviewer.handle_turn(id, text).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(responder.calls().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_keywords_fall_back_to_general() {
        let responder = Arc::new(ScriptedResponder::new().reply("Hello! Let's begin."));
        let (interviewer, store) = interviewer(responder.clone());

        interviewer.handle_turn("s1", "Hi").await.unwrap();

        let calls = responder.calls();
        assert!(calls[0][0].content.contains("Resume Keywords: general"));
        // Fallback is applied per turn, not written back.
        assert!(store.get_keywords("s1").is_empty());
    }

    #[tokio::test]
    async fn test_resume_to_second_turn_scenario() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .reply("Python, Docker")
                .reply("Welcome! Could you introduce yourself?")
                .reply("Great. How do you size Docker images?"),
        );
        let (interviewer, store) = interviewer(responder.clone());

        let candidates: Vec<String> = ["python", "flask", "docker", "team", "resume"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let keywords = KeywordCurator::new(responder.clone()).curate(&candidates).await;
        assert_eq!(keywords.clone().into_vec(), vec!["python", "docker"]);
        store.set_keywords("s1", keywords.iter());

        let first = interviewer.handle_turn("s1", "Hi, I'm ready").await.unwrap();
        assert_eq!(first, "Welcome! Could you introduce yourself?");

        let second = interviewer
            .handle_turn("s1", "I'm a backend developer")
            .await
            .unwrap();
        assert_eq!(second, "Great. How do you size Docker images?");

        let calls = responder.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(roles(&calls[1]), vec![Role::System, Role::User]);
        assert!(calls[1][0].content.contains("Resume Keywords: python, docker"));
        assert_eq!(calls[1][1].content, "Hi, I'm ready");
        assert_eq!(
            roles(&calls[2]),
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(calls[2][2].content, first);
        assert_eq!(calls[2][3].content, "I'm a backend developer");

        let history = store.get("s1").unwrap().history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[3], Turn::assistant(second));
    }

    #[tokio::test]
    async fn test_responder_failure_keeps_user_turn_only() {
        let responder = Arc::new(
            ScriptedResponder::new()
                .fail(503, "backend unavailable")
                .reply("Sorry about that. Shall we start?"),
        );
        let (interviewer, store) = interviewer(responder.clone());

        let err = interviewer.handle_turn("s1", "first try").await.unwrap_err();
        assert!(matches!(err, AppError::Responder(LlmError::Api { status: 503, .. })));

        let history = store.get("s1").unwrap().history();
        assert_eq!(history, vec![Turn::human("first try")]);

        interviewer.handle_turn("s1", "second try").await.unwrap();
        let retry_context = &responder.calls()[1];
        assert_eq!(
            roles(retry_context),
            vec![Role::System, Role::User, Role::User]
        );
        assert_eq!(retry_context[1].content, "first try");
        assert_eq!(retry_context[2].content, "second try");
    }

    #[tokio::test]
    async fn test_blank_reply_is_a_responder_failure() {
        let responder = Arc::new(ScriptedResponder::new().reply("   "));
        let (interviewer, store) = interviewer(responder);

        let err = interviewer.handle_turn("s1", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Responder(LlmError::EmptyContent)));
        let speakers: Vec<_> = store
            .get("s1")
            .unwrap()
            .history()
            .iter()
            .map(|t| t.speaker)
            .collect();
        assert_eq!(speakers, vec![Speaker::Human]);
    }

    #[tokio::test]
    async fn test_keyword_change_applies_to_next_turn() {
        let responder = Arc::new(ScriptedResponder::new().reply("one").reply("two"));
        let (interviewer, store) = interviewer(responder.clone());

        store.set_keywords("s1", ["rust"]);
        interviewer.handle_turn("s1", "hi").await.unwrap();
        store.set_keywords("s1", ["kafka"]);
        interviewer.handle_turn("s1", "next").await.unwrap();

        let calls = responder.calls();
        assert!(calls[0][0].content.contains("Resume Keywords: rust"));
        assert!(calls[1][0].content.contains("Resume Keywords: kafka"));
        assert_eq!(calls[1].len(), 4);
    }

    /// Never answers, to exercise the timeout path.
    struct HangingResponder;

    #[async_trait]
    impl Responder for HangingResponder {
        async fn predict(&self, _messages: &[Message]) -> Result<String, LlmError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_responder_failure() {
        let store = SessionStore::new(TTL);
        let interviewer = Interviewer::new(store.clone(), Arc::new(HangingResponder), TIMEOUT);

        let err = interviewer.handle_turn("s1", "hello?").await.unwrap_err();
        assert!(matches!(err, AppError::Responder(LlmError::Timeout(t)) if t == TIMEOUT));
        assert_eq!(store.get("s1").unwrap().history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_timeout_keeps_its_precision() {
        let store = SessionStore::new(TTL);
        let interviewer = Interviewer::new(
            store,
            Arc::new(HangingResponder),
            Duration::from_millis(250),
        );

        let err = interviewer.handle_turn("s1", "hello?").await.unwrap_err();
        assert!(err.to_string().contains("250ms"));
    }

    /// Echoes the number of history messages it saw, after yielding once so
    /// concurrent turns would interleave without the per-session lock.
    struct CountingResponder;

    #[async_trait]
    impl Responder for CountingResponder {
        async fn predict(&self, messages: &[Message]) -> Result<String, LlmError> {
            tokio::task::yield_now().await;
            Ok(format!("saw {}", messages.len() - 1))
        }
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_are_serialized() {
        let store = SessionStore::new(TTL);
        let interviewer = Arc::new(Interviewer::new(
            store.clone(),
            Arc::new(CountingResponder),
            TIMEOUT,
        ));

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let interviewer = interviewer.clone();
                tokio::spawn(async move { interviewer.handle_turn("s1", &format!("msg {i}")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let history = store.get("s1").unwrap().history();
        assert_eq!(history.len(), 10);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].speaker, Speaker::Human);
            assert_eq!(pair[1], Turn::assistant(format!("saw {}", 2 * i + 1)));
        }
    }
}
