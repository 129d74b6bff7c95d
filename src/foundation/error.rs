/// Convenience result type used across captionstack.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Top-level error taxonomy for a compositing job.
///
/// Every variant is terminal for the job that raised it: no partial image is
/// returned alongside an error.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// No caption lines were supplied, or there is nothing to composite.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Layers of differing size reached the compositor.
    #[error(
        "dimension mismatch: layer {index} is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        /// Position of the offending layer.
        index: usize,
        /// Width shared by the preceding layers.
        expected_width: u32,
        /// Height shared by the preceding layers.
        expected_height: u32,
        /// Width of the offending layer.
        found_width: u32,
        /// Height of the offending layer.
        found_height: u32,
    },

    /// A color string was not `#RRGGBB`.
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// Source image exceeds the configured byte or pixel limits.
    #[error("oversized input: {0}")]
    OversizedInput(String),

    /// Text layout or rasterization could not produce a layer.
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// Invalid user-provided style or geometry values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`CaptionError::InvalidColorFormat`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColorFormat(msg.into())
    }

    /// Build a [`CaptionError::OversizedInput`] value.
    pub fn oversized(msg: impl Into<String>) -> Self {
        Self::OversizedInput(msg.into())
    }

    /// Build a [`CaptionError::RenderFailure`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }

    /// Build a [`CaptionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
