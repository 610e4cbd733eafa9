use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, NnError>;

#[derive(Debug, Error)]
pub enum NnError {
    /// Two matrices with incompatible dimensions were combined.
    #[error("shape mismatch in {op}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// An input or target sequence does not match the width of its layer.
    #[error("dimension mismatch on {layer} layer: expected {expected} values, got {actual}")]
    DimensionMismatch {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decoded model whose arrays disagree with its own layer sizes.
    #[error("corrupt model: {0}")]
    CorruptModel(String),
}

impl NnError {
    pub(crate) fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        NnError::ShapeMismatch { op, left, right }
    }

    /// True for the persistence failures (I/O, decoding, inconsistent model).
    pub fn is_serialization(&self) -> bool {
        matches!(self, NnError::Io(_) | NnError::Json(_) | NnError::CorruptModel(_))
    }
}
