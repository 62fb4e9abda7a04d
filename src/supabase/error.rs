//! Backend error types

use serde::Deserialize;

/// Error body returned by the PostgREST layer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Error type for remote backend operations
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the backend, with its own error text
    #[error("backend error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl SupabaseError {
    /// Build an API error from a status code and the raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();
        SupabaseError::Api {
            status,
            message: parsed
                .message
                .unwrap_or_else(|| body.chars().take(300).collect()),
            code: parsed.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_parses_postgrest_body() {
        let body = r#"{"message":"duplicate key value","code":"23505","details":null,"hint":null}"#;
        let err = SupabaseError::from_response(409, body);
        match err {
            SupabaseError::Api { status, message, code } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate key value");
                assert_eq!(code.as_deref(), Some("23505"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_response_falls_back_to_raw_body() {
        let err = SupabaseError::from_response(500, "upstream exploded");
        assert!(err.to_string().contains("upstream exploded"));
    }
}
