/// Convenience result type used across the board.
pub type BoardResult<T> = Result<T, BoardError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum BoardError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A point file could not be decoded.
    #[error("point file error: {0}")]
    PointFile(String),

    /// A frame could not be produced by the pre-render pipeline.
    #[error("prerender error: {0}")]
    Prerender(String),

    /// Rasterization of a frame artifact failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem failures.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoardError {
    /// Build a [`BoardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoardError::PointFile`] value.
    pub fn point_file(msg: impl Into<String>) -> Self {
        Self::PointFile(msg.into())
    }

    /// Build a [`BoardError::Prerender`] value.
    pub fn prerender(msg: impl Into<String>) -> Self {
        Self::Prerender(msg.into())
    }

    /// Build a [`BoardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
