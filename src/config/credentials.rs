//! Upstream credentials.
//!
//! Read once from the process environment and handed to the handlers as an
//! immutable value. A missing credential is not a startup failure: the
//! handler that needs it reports `ConfigurationMissing` on every request.

use std::fmt;

/// Environment variable holding the sports-data API token.
pub const FOOTBALL_DATA_TOKEN_VAR: &str = "FOOTBALL_DATA_TOKEN";

/// Environment variable holding the generative-AI API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Clone, Default)]
pub struct Credentials {
    football_data_token: Option<String>,
    gemini_api_key: Option<String>,
}

impl Credentials {
    pub fn new(football_data_token: Option<String>, gemini_api_key: Option<String>) -> Self {
        Self {
            football_data_token: football_data_token.filter(|v| !v.is_empty()),
            gemini_api_key: gemini_api_key.filter(|v| !v.is_empty()),
        }
    }

    /// Load credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(lookup(FOOTBALL_DATA_TOKEN_VAR), lookup(GEMINI_API_KEY_VAR))
    }

    pub fn football_data_token(&self) -> Option<&str> {
        self.football_data_token.as_deref()
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<missing>" };
        f.debug_struct("Credentials")
            .field("football_data_token", &redact(&self.football_data_token))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_reads_both_variables() {
        let creds = Credentials::from_lookup(|name| match name {
            FOOTBALL_DATA_TOKEN_VAR => Some("fd-token".to_string()),
            GEMINI_API_KEY_VAR => Some("ai-key".to_string()),
            _ => None,
        });
        assert_eq!(creds.football_data_token(), Some("fd-token"));
        assert_eq!(creds.gemini_api_key(), Some("ai-key"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let creds = Credentials::from_lookup(|_| Some(String::new()));
        assert!(creds.football_data_token().is_none());
        assert!(creds.gemini_api_key().is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new(Some("super-secret".into()), None);
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<set>"));
        assert!(printed.contains("<missing>"));
    }
}
