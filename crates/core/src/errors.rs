use thiserror::Error;

/// Unified error type for the entire finance-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the bearer token (HTTP 401).
    /// Never folded into `Api`: callers clear the session and redirect to login.
    #[error("Unauthorized — please log in again")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Category could not be resolved: {0}")]
    CategoryNotResolved(String),

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Local state ─────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// `true` for the 401 class, which must trigger a redirect to login.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Unauthorized)
    }

    /// `true` for errors raised before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::ValidationError(_))
    }

    /// Text suitable for showing to the user.
    ///
    /// Server-provided messages are passed through; transport details are not.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            CoreError::ValidationError(msg) => msg.clone(),
            CoreError::Unauthorized | CoreError::NotAuthenticated => {
                "Your session has expired. Please log in again.".to_string()
            }
            CoreError::CategoryNotResolved(_) => "Please select a category.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs: filter values (search text,
        // amounts) end up there and do not belong in logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
