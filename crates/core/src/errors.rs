use thiserror::Error;

/// Unified error type for the entire stock-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// The store keeps the most recent error as part of its state, so the
/// type is `Clone` and carries messages rather than foreign error values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // ── Store operations ────────────────────────────────────────────
    #[error("Failed to load holdings: {0}")]
    Load(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to add holding: {0}")]
    Add(String),

    #[error("Failed to update holding: {0}")]
    Update(String),

    #[error("Failed to delete holding: {0}")]
    Delete(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote store returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// `true` for errors raised by client-side checks, before any remote call.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; strip query parameters so
        // credentials passed that way never end up in the visible error.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if let Some(status) = e.status() {
            return CoreError::Api {
                status: status.as_u16(),
                message: sanitized,
            };
        }
        if e.is_decode() {
            return CoreError::Deserialization(sanitized);
        }
        CoreError::Network(sanitized)
    }
}

impl From<url::ParseError> for CoreError {
    fn from(e: url::ParseError) -> Self {
        CoreError::Config(format!("invalid URL: {e}"))
    }
}
