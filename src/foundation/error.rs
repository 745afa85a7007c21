/// Convenience result type used across softshadow.
pub type ShadowResult<T> = Result<T, ShadowError>;

/// Top-level error taxonomy used by the shadow pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ShadowError {
    /// Configuration rejected at construction time. Fatal to the caller.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A pixel buffer was requested with a zero or negative side.
    ///
    /// The renderer treats this as "skip the shadow for this frame" rather than failing the draw.
    #[error("invalid dimension: {width}x{height}")]
    InvalidDimension {
        /// Requested width in pixels.
        width: i64,
        /// Requested height in pixels.
        height: i64,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShadowError {
    /// Build a [`ShadowError::InvalidConfig`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`ShadowError::InvalidDimension`] value.
    pub fn invalid_dimension(width: impl Into<i64>, height: impl Into<i64>) -> Self {
        Self::InvalidDimension {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Build a [`ShadowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for per-frame degeneracies the renderer recovers from locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidDimension { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
