//! Error types shared across the crate.
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between image decode and evaluation.
#[derive(Debug, Error)]
pub enum Error {
    /// An image could not be decoded, or a decoded buffer violated its
    /// declared dimensions. Never downgraded to an empty image.
    #[error("decode error: {0}")]
    Decode(String),

    /// A feature vector's length does not match the model's input layer.
    #[error("shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Persisted model data is malformed or has inconsistent shapes.
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Training or evaluation was invoked with zero samples.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Layer size list rejected at construction time.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A sample's label does not index the dataset's class list.
    #[error("label {label} out of range for {classes} classes")]
    LabelOutOfRange { label: usize, classes: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
