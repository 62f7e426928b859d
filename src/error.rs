use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Parsing and matching never produce these; a stage that recovers nothing
/// returns `None` or an empty collection instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A credential or setting required by a stage is missing or invalid.
    #[error("configuration error: {what}")]
    Configuration { what: String },

    /// The model service failed or answered with an error status.
    /// `status` is 0 when no HTTP status was received.
    #[error("upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },
}

impl EngineError {
    pub fn configuration(what: impl Into<String>) -> Self {
        EngineError::Configuration { what: what.into() }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        EngineError::Upstream {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Upstream {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        }
    }
}
