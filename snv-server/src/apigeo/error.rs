//! APIGEO client error types.

/// Errors from the APIGEO HTTP client and its fixture-backed mock.
#[derive(Debug, thiserror::Error)]
pub enum ApiGeoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-success status other than 404
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client could not be configured
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fixture data could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_ref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl ApiGeoError {
    /// Build a [`ApiGeoError::Json`] from a decoding failure, keeping the
    /// start of the offending body for diagnostics.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        ApiGeoError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
