//! Error type shared by the generators and the embedding tables.

/// Errors raised while generating codebooks or looking up rows.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Output buffer has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Randomness must lie in [0, 1], got {0}")]
    InvalidRandomness(f64),

    #[error("Invalid input domain: low={low}, high={high}")]
    InvalidDomain { low: f64, high: f64 },

    #[error("Codebook must have at least one row and one column, got {num_embeddings}x{embedding_dim}")]
    EmptyCodebook {
        num_embeddings: usize,
        embedding_dim: usize,
    },

    #[error("Padding index {padding_idx} out of range for {num_embeddings} embeddings")]
    PaddingIndexOutOfRange {
        padding_idx: isize,
        num_embeddings: usize,
    },

    #[error("Invalid norm settings: max_norm={max_norm:?}, norm_type={norm_type}")]
    InvalidNorm { max_norm: Option<f32>, norm_type: f32 },

    #[error("Index {index} out of range for {num_embeddings} embeddings")]
    IndexOutOfRange { index: i64, num_embeddings: usize },

    #[error("Input value {0} is not finite")]
    NonFiniteInput(f64),

    #[error("Cannot shape lookup output: {0}")]
    InvalidShape(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EmbeddingError>;
