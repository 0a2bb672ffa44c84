use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `GROQ_API_KEY` is deliberately optional: when it is absent the service
/// runs in degraded mode and every rewrite returns the original bullet
/// unchanged instead of failing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_model: std::env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns `None` for unset or blank variables so an empty `GROQ_API_KEY=`
/// line in .env still selects degraded mode.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_blank_is_none() {
        std::env::set_var("REVIEWER_TEST_BLANK", "   ");
        assert_eq!(optional_env("REVIEWER_TEST_BLANK"), None);
        std::env::remove_var("REVIEWER_TEST_BLANK");
    }

    #[test]
    fn test_optional_env_missing_is_none() {
        assert_eq!(optional_env("REVIEWER_TEST_DEFINITELY_UNSET"), None);
    }
}
