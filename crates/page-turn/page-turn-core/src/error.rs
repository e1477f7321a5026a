//! Error types for the page-turn core.
//!
//! Only construction and parsing are fallible. The per-frame path clamps or
//! falls back instead of failing.

/// Errors surfaced while building an engine or parsing host-provided JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PageTurnError {
    /// A configuration value is outside its usable domain.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Config or page list JSON could not be decoded.
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for PageTurnError {
    fn from(err: serde_json::Error) -> Self {
        PageTurnError::Serialization {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PageTurnError>;
