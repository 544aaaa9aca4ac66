//! Resolution of the secrets the search graph needs.

use crate::error::SearchGraphError;
use std::fmt;

/// Environment variable holding the LLM provider key.
pub const LLM_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable holding the search provider key.
pub const SEARCH_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable that overrides the service endpoint.
pub const ENDPOINT_ENV_VAR: &str = "SEARCH_GRAPH_URL";

/// Secrets forwarded to the search graph with every request.
#[derive(Clone)]
pub struct Credentials {
    /// Key for the LLM provider.
    pub llm_api_key: String,
    /// Key for the web search provider.
    pub search_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads both keys from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SearchGraphError::MissingCredential` naming the first variable
    /// that is unset or empty.
    pub fn from_env() -> Result<Self, SearchGraphError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads both keys through `lookup`, treating blank values as missing.
    ///
    /// # Errors
    ///
    /// Returns `SearchGraphError::MissingCredential` naming the first key that
    /// could not be resolved.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchGraphError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| SearchGraphError::MissingCredential(name.to_string()))
        };

        Ok(Self {
            llm_api_key: require(LLM_API_KEY_ENV)?,
            search_api_key: require(SEARCH_API_KEY_ENV)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_both_keys_resolved() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (LLM_API_KEY_ENV, "sk-llm"),
            (SEARCH_API_KEY_ENV, "g-search"),
        ]))
        .unwrap();
        assert_eq!(creds.llm_api_key, "sk-llm");
        assert_eq!(creds.search_api_key, "g-search");
    }

    #[test]
    fn test_missing_search_key_is_named() {
        let err = Credentials::from_lookup(lookup_from(&[(LLM_API_KEY_ENV, "sk-llm")])).unwrap_err();
        match err {
            SearchGraphError::MissingCredential(name) => assert_eq!(name, SEARCH_API_KEY_ENV),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (LLM_API_KEY_ENV, "   "),
            (SEARCH_API_KEY_ENV, "g-search"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SearchGraphError::MissingCredential(name) if name == LLM_API_KEY_ENV));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let creds = Credentials {
            llm_api_key: "sk-llm".to_string(),
            search_api_key: "g-search".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("sk-llm"));
        assert!(!debug.contains("g-search"));
    }
}
