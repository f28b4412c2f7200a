use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// How many words the daily rotation hands out.
    pub words_per_day: usize,
    /// Target language for the `meaning` field, e.g. "Hindi".
    pub meaning_language: String,
    /// TrueType font able to render the meaning language. Optional: export falls
    /// back to Helvetica with an in-document disclaimer when absent.
    pub meaning_font_path: Option<PathBuf>,
    pub export_filename: String,
    pub page_title: String,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            words_per_day: parse_positive("WORDS_PER_DAY", 7)
                .context("WORDS_PER_DAY must be a positive integer")?,
            meaning_language: std::env::var("MEANING_LANGUAGE")
                .unwrap_or_else(|_| "Hindi".to_string()),
            meaning_font_path: std::env::var("MEANING_FONT_PATH").ok().map(PathBuf::from),
            export_filename: std::env::var("EXPORT_FILENAME")
                .unwrap_or_else(|_| "lexidaily_words.pdf".to_string()),
            page_title: std::env::var("PAGE_TITLE")
                .unwrap_or_else(|_| "LexiDaily: Today's Words".to_string()),
            llm_timeout_secs: parse_positive("LLM_TIMEOUT_SECS", 120)
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}

/// Like `parse_env`, but zero is rejected.
fn parse_positive<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_env(key, default)?;
    anyhow::ensure!(value >= T::from(1), "{key} must be at least 1");
    Ok(value)
}
