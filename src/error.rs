//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context to act on the failure without
//! digging through the call site.

use crate::data::Split;
use thiserror::Error;

/// Result type alias for paciencia operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a training session.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration value is invalid. Reported before the run starts.
    #[error("invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// A dataset split yields zero complete batches.
    #[error("{split} split yields no complete batches\n  → Reduce batch_size or provide more examples")]
    EmptySplit { split: Split },

    /// A batch index fell outside the split's range.
    #[error("batch index {index} out of range for {split} split ({len} batches)")]
    BatchOutOfRange { split: Split, index: usize, len: usize },

    /// Model and dataset disagree on array shapes.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A target label does not fit the model's output layer.
    #[error("class label {label} out of range for a {classes}-class model")]
    LabelOutOfRange { label: u8, classes: usize },

    /// The model produced a non-finite loss or error rate. Fatal: the run
    /// aborts and only the last persisted checkpoint survives.
    #[error("non-finite loss at epoch {epoch}, iteration {iter}\n  → Lower the learning rate or check the input data")]
    NonFiniteLoss { epoch: usize, iter: usize },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a configuration error for a named field.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), message: message.into() }
    }
}
