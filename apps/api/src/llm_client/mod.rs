//! LLM Client: the single point of entry for all Gemini API calls in the interview service.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Everything else talks to the `Responder` trait, which this client implements.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";
const MAX_OUTPUT_TOKENS: u32 = 2048;
/// One initial attempt plus two retries.
const MAX_ATTEMPTS: u32 = 3;
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

// ────────────────────────────────────────────────────────────────────────────
// Provider-neutral message model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in the ordered sequence sent to a `Responder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The language-reasoning backend, treated as a black box.
///
/// Output is non-deterministic; callers must never assume identical input yields
/// identical text. Carried in `AppState` as `Arc<dyn Responder>`.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn predict(&self, messages: &[Message]) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Converts the ordered message sequence into a Gemini request.
///
/// System messages are folded into `systemInstruction`, assistant turns use the
/// `model` role, and consecutive same-role messages share one content block
/// since the API expects alternating roles.
fn to_gemini_request(messages: &[Message], temperature: f32) -> GeminiRequest {
    let system_text: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let system_instruction = (!system_text.is_empty()).then(|| GeminiContent {
        role: None,
        parts: vec![GeminiPart {
            text: system_text.join("\n\n"),
        }],
    });

    let mut contents: Vec<GeminiContent> = Vec::new();
    for message in messages.iter().filter(|m| m.role != Role::System) {
        let role = match message.role {
            Role::Assistant => "model",
            _ => "user",
        };
        let part = GeminiPart {
            text: message.content.clone(),
        };
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => contents.push(GeminiContent {
                role: Some(role.to_string()),
                parts: vec![part],
            }),
        }
    }

    GeminiRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            temperature,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with retry logic.
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
            temperature: 0.7,
        })
    }

    /// Returns a client sharing the same connection pool with a different temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, messages: &[Message]) -> Result<GeminiResponse, LlmError> {
        let request_body = to_gemini_request(messages, self.temperature);
        let url = format!("{GEMINI_BASE_URL}/models/{}:generateContent", self.model);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.bytes().await?;
            let llm_response: GeminiResponse = serde_json::from_slice(&body)?;

            if let Some(usage) = &llm_response.usage_metadata {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    self.model, usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_ATTEMPTS - 1,
        }))
    }
}

#[async_trait]
impl Responder for LlmClient {
    async fn predict(&self, messages: &[Message]) -> Result<String, LlmError> {
        let response = self.call(messages).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_become_system_instruction() {
        let messages = vec![
            Message::system("You are an interviewer."),
            Message::user("Hi, I'm ready"),
        ];
        let request = to_gemini_request(&messages, 0.7);

        let system = request.system_instruction.expect("system instruction");
        assert_eq!(system.parts[0].text, "You are an interviewer.");
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_assistant_maps_to_model_role() {
        let messages = vec![
            Message::user("Hello"),
            Message::assistant("Welcome! Tell me about yourself."),
            Message::user("I build APIs"),
        ];
        let request = to_gemini_request(&messages, 0.7);
        let roles: Vec<_> = request
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert!(request.system_instruction.is_none());
    }

    #[test]
    fn test_consecutive_user_messages_share_one_content_block() {
        // Happens after a failed turn: the unanswered user message stays in history.
        let messages = vec![
            Message::system("persona"),
            Message::user("first attempt"),
            Message::user("second attempt"),
        ];
        let request = to_gemini_request(&messages, 0.7);
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].parts.len(), 2);
        assert_eq!(request.contents[0].parts[1].text, "second attempt");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = to_gemini_request(&[Message::system("s"), Message::user("u")], 0.5);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], MAX_OUTPUT_TOKENS);
        assert!(json["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Python, "}, {"text": "Docker"}]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("Python, Docker"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(response.text().is_none());

        let blank: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#)
                .unwrap();
        assert!(blank.text().is_none());
    }
}
