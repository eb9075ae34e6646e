/// Convenience result type used across the plotting engine.
pub type PlotResult<T> = Result<T, PlotError>;

/// Error taxonomy for drawing calls, page lifecycle and output encoding.
///
/// Out-of-range attribute values are never errors; setters clamp them to documented defaults.
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    /// A drawing call issued while the plotter is closed, or `openpl` while already open.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A coordinate-space request that would produce a non-invertible mapping.
    #[error("singular transform: {0}")]
    SingularTransform(String),

    /// Failure writing to or flushing the output sink.
    #[error("output stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// Failure inside an output-format encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed configuration or script input.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlotError {
    /// Build a [`PlotError::InvalidOperation`] value.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Build a [`PlotError::SingularTransform`] value.
    pub fn singular_transform(msg: impl Into<String>) -> Self {
        Self::SingularTransform(msg.into())
    }

    /// Build a [`PlotError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PlotError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
