//! Environment-driven configuration.
//!
//! The relay is meant to run inside an automation pipeline, so everything
//! that is not an artifact path comes from the environment: `MODEL` selects
//! the model, `OPENAI_API_KEY` authenticates, `OPENAI_BASE_URL` redirects
//! the endpoint (useful for proxies and tests). The API key is held as a
//! [`SecretString`] and never logged or written to any artifact.

use secrecy::SecretString;

use crate::error::Error;

/// Model used when `MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-5-pro-2025-10-06";

/// Endpoint used when `OPENAI_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Configuration for the remote completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model identifier sent with every request and recorded in history.
    pub model: String,
    /// Base URL of the completion service.
    pub base_url: String,
    /// Bearer credential for the service.
    pub api_key: SecretString,
}

impl LlmConfig {
    /// Assemble configuration from the process environment.
    ///
    /// `OPENAI_API_KEY` is required; `MODEL` and `OPENAI_BASE_URL` fall back
    /// to defaults when unset or blank.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| Error::Config {
                reason: "OPENAI_API_KEY is not set".to_string(),
            })?;

        Ok(Self {
            model: env_or("MODEL", DEFAULT_MODEL),
            base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            api_key,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_for_unset_variable() {
        assert_eq!(
            env_or("THREADLINE_TEST_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn default_model_matches_service_default() {
        assert_eq!(DEFAULT_MODEL, "gpt-5-pro-2025-10-06");
    }
}
