use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
///
/// The OpenAI key is optional here: without it the server still starts, but
/// every analysis request is refused until the key is configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_timeout_secs: u64,
    pub static_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_timeout_secs: match optional_env("OPENAI_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("OPENAI_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_OPENAI_TIMEOUT_SECS,
            },
            static_dir: optional_env("STATIC_DIR")
                .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("TASK_ANALYZER_TEST_BLANK", "   ");
        assert_eq!(optional_env("TASK_ANALYZER_TEST_BLANK"), None);
        std::env::remove_var("TASK_ANALYZER_TEST_BLANK");
    }

    #[test]
    fn test_optional_env_trims_value() {
        std::env::set_var("TASK_ANALYZER_TEST_KEY", " sk-test \n");
        assert_eq!(
            optional_env("TASK_ANALYZER_TEST_KEY").as_deref(),
            Some("sk-test")
        );
        std::env::remove_var("TASK_ANALYZER_TEST_KEY");
    }

    #[test]
    fn test_optional_env_missing() {
        assert_eq!(optional_env("TASK_ANALYZER_TEST_DEFINITELY_UNSET"), None);
    }
}
