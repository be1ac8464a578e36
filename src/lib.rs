//! # hdc-embeddings
//!
//! Embedding tables that map categorical or scalar inputs to hypervectors
//! for hyperdimensional computing (HDC).
//!
//! ## Embeddings
//!
//! 1. **Identity**: every row is the binding identity
//! 2. **Random**: independent, near-orthogonal rows
//! 3. **Level**: similarity decays with |i − j|; scalar inputs saturate
//! 4. **Circular**: similarity decays with ring distance; scalar inputs wrap
//!
//! ## Layout
//!
//! - `functional`: codebook generators and MAP similarity algebra
//! - `embeddings`: the generic table, its strategies and the four variants

pub mod embeddings;
pub mod error;
pub mod functional;

pub use embeddings::{
    CircularEmbedding, EmbeddingTable, IdentityEmbedding, LevelEmbedding, RandomEmbedding,
    ScalarEncoding, TableConfig,
};
pub use error::{EmbeddingError, Result};

/// Crate-wide defaults.
pub mod config {
    /// Default hypervector dimension.
    pub const DEFAULT_EMBEDDING_DIM: usize = 10_000;

    /// Default codebook size.
    pub const DEFAULT_NUM_EMBEDDINGS: usize = 16;

    /// Default generation seed.
    pub const DEFAULT_SEED: u64 = 0x4D41_5048;

    /// Lower input bound for level and circular embeddings.
    pub const DEFAULT_LOW: f64 = 0.0;

    /// Upper input bound for level embeddings.
    pub const DEFAULT_LEVEL_HIGH: f64 = 1.0;

    /// Period of circular embeddings (radians).
    pub const DEFAULT_CIRCULAR_HIGH: f64 = std::f64::consts::TAU;

    /// Fully graded codebooks by default.
    pub const DEFAULT_RANDOMNESS: f64 = 0.0;

    /// Euclidean norm for `max_norm`.
    pub const DEFAULT_NORM_TYPE: f32 = 2.0;
}
