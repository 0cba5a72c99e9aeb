/// Convenience result type used across Lantern.
pub type LanternResult<T> = Result<T, LanternError>;

/// Top-level error taxonomy used by runtime APIs.
///
/// Per-resource fetch failures are not reported through this type: they are recorded on the
/// resource and folded into the batch outcome. Everything here is a caller-visible failure.
#[derive(thiserror::Error, Debug)]
pub enum LanternError {
    /// Invalid caller-provided data (frames, options, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource lookup, registration or decoding errors.
    #[error("resource error: {0}")]
    Resource(String),

    /// Errors while resolving timeline state for a sampled time.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Errors while compositing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LanternError {
    /// Build a [`LanternError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LanternError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`LanternError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`LanternError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LanternError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LanternError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
