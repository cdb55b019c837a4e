use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_token: String,
    pub llm_api_url: String,
    pub llm_timeout_secs: u64,
    /// Single explanations allowed per caller per window.
    pub explain_rate_limit: usize,
    /// Bulk pattern analyses allowed per caller per window.
    pub pattern_rate_limit: usize,
    pub rate_window_ms: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_token: require_env("LLM_API_TOKEN")?,
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 30)?,
            explain_rate_limit: parse_env("EXPLAIN_RATE_LIMIT", 10)?,
            pattern_rate_limit: parse_env("PATTERN_RATE_LIMIT", 3)?,
            rate_window_ms: positive_window(parse_env("RATE_WINDOW_MS", 60_000)?)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// A window of zero or less would expire every attempt on arrival.
fn positive_window(window_ms: i64) -> Result<i64> {
    if window_ms <= 0 {
        bail!("RATE_WINDOW_MS must be a positive number of milliseconds, got {window_ms}");
    }
    Ok(window_ms)
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("WHYNOT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("WHYNOT_TEST_BAD_NUMBER", "ten");
        let result: Result<u16> = parse_env("WHYNOT_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
        std::env::remove_var("WHYNOT_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_window_must_be_positive() {
        assert!(positive_window(0).is_err());
        assert!(positive_window(-60_000).is_err());
        assert_eq!(positive_window(60_000).unwrap(), 60_000);
    }

    #[test]
    fn test_parse_env_trims_whitespace() {
        std::env::set_var("WHYNOT_TEST_PADDED_NUMBER", " 7 ");
        let value: usize = parse_env("WHYNOT_TEST_PADDED_NUMBER", 1).unwrap();
        assert_eq!(value, 7);
        std::env::remove_var("WHYNOT_TEST_PADDED_NUMBER");
    }
}
