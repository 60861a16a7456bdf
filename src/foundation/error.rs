/// Convenience result type used across skinforge.
pub type SkinResult<T> = Result<T, SkinError>;

/// Error taxonomy shared by the codec, geometry, compositing and audit APIs.
#[derive(thiserror::Error, Debug)]
pub enum SkinError {
    /// Unrecognized byte length, mismatched dimensions or a malformed packed buffer.
    #[error("format error: {0}")]
    Format(String),

    /// Model description uses a layout the bounds calculator does not model (mirrored UVs).
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// An external image, model or persisted skin could not be loaded or stored.
    #[error("resource error: {0}")]
    Resource(String),

    /// Invalid caller-provided arguments or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SkinError {
    /// Build a [`SkinError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`SkinError::UnsupportedGeometry`] value.
    pub fn unsupported_geometry(msg: impl Into<String>) -> Self {
        Self::UnsupportedGeometry(msg.into())
    }

    /// Build a [`SkinError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`SkinError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
