use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Sampling temperature for interview turns.
    pub chat_temperature: f32,
    /// Sampling temperature for keyword curation. Kept lower than chat so the
    /// comma-separated reply stays terse.
    pub curation_temperature: f32,
    pub responder_timeout: Duration,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_MODEL.to_string()),
            port: parse_env("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chat_temperature: parse_env("CHAT_TEMPERATURE", 0.7)?,
            curation_temperature: parse_env("CURATION_TEMPERATURE", 0.5)?,
            responder_timeout: duration_env("RESPONDER_TIMEOUT_SECS", 60, 1)?,
            session_ttl: duration_env("SESSION_TTL_MINUTES", 120, 60)?,
            session_sweep_interval: duration_env("SESSION_SWEEP_SECS", 60, 1)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
/// A value that is present but unparseable is a startup error, not a silent default.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Reads a positive duration expressed in `unit_secs`-second units.
/// Zero is rejected, as is any value whose length in seconds overflows `u64`.
fn duration_env(key: &str, default: u64, unit_secs: u64) -> Result<Duration> {
    let value: u64 = parse_env(key, default)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    let secs = value
        .checked_mul(unit_secs)
        .with_context(|| format!("{key} is out of range: {value}"))?;
    Ok(Duration::from_secs(secs))
}
