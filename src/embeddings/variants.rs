//! The four concrete embeddings.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::embeddings::generator::{
    CircularGenerator, IdentityGenerator, LevelGenerator, RandomGenerator,
};
use crate::embeddings::quantizer::{CircularQuantizer, IndexQuantizer, LevelQuantizer};
use crate::embeddings::table::{EmbeddingTable, TableConfig};
use crate::error::Result;

/// Identity hypervector in every row; integer lookup.
pub type IdentityEmbedding = EmbeddingTable<IdentityGenerator, IndexQuantizer>;

/// Independent random hypervectors; integer lookup.
pub type RandomEmbedding = EmbeddingTable<RandomGenerator, IndexQuantizer>;

/// Graded similarity along a line; saturating scalar lookup.
pub type LevelEmbedding = EmbeddingTable<LevelGenerator, LevelQuantizer>;

/// Graded similarity around a ring; periodic scalar lookup.
pub type CircularEmbedding = EmbeddingTable<CircularGenerator, CircularQuantizer>;

/// Input domain and randomness blend of a scalar embedding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarEncoding {
    pub low: f64,
    pub high: f64,
    pub randomness: f64,
}

impl ScalarEncoding {
    /// `[0, 1]`, fully graded.
    pub fn level() -> Self {
        Self {
            low: config::DEFAULT_LOW,
            high: config::DEFAULT_LEVEL_HIGH,
            randomness: config::DEFAULT_RANDOMNESS,
        }
    }

    /// `[0, 2π)`, fully graded.
    pub fn circular() -> Self {
        Self {
            low: config::DEFAULT_LOW,
            high: config::DEFAULT_CIRCULAR_HIGH,
            randomness: config::DEFAULT_RANDOMNESS,
        }
    }

    pub fn with_domain(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }
}

impl EmbeddingTable<IdentityGenerator, IndexQuantizer> {
    pub fn new(num_embeddings: usize, embedding_dim: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(num_embeddings, embedding_dim))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::from_parts(config, IdentityGenerator, IndexQuantizer)
    }
}

impl EmbeddingTable<RandomGenerator, IndexQuantizer> {
    pub fn new(num_embeddings: usize, embedding_dim: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(num_embeddings, embedding_dim))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::from_parts(config, RandomGenerator, IndexQuantizer)
    }
}

impl EmbeddingTable<LevelGenerator, LevelQuantizer> {
    pub fn new(num_embeddings: usize, embedding_dim: usize) -> Result<Self> {
        Self::with_config(
            TableConfig::new(num_embeddings, embedding_dim),
            ScalarEncoding::level(),
        )
    }

    pub fn with_config(config: TableConfig, encoding: ScalarEncoding) -> Result<Self> {
        Self::from_parts(
            config,
            LevelGenerator::new(encoding.randomness)?,
            LevelQuantizer::new(encoding.low, encoding.high)?,
        )
    }

    pub fn low(&self) -> f64 {
        self.quantizer().low()
    }

    pub fn high(&self) -> f64 {
        self.quantizer().high()
    }

    pub fn randomness(&self) -> f64 {
        self.generator().randomness()
    }
}

impl EmbeddingTable<CircularGenerator, CircularQuantizer> {
    pub fn new(num_embeddings: usize, embedding_dim: usize) -> Result<Self> {
        Self::with_config(
            TableConfig::new(num_embeddings, embedding_dim),
            ScalarEncoding::circular(),
        )
    }

    pub fn with_config(config: TableConfig, encoding: ScalarEncoding) -> Result<Self> {
        Self::from_parts(
            config,
            CircularGenerator::new(encoding.randomness)?,
            CircularQuantizer::new(encoding.low, encoding.high)?,
        )
    }

    pub fn low(&self) -> f64 {
        self.quantizer().low()
    }

    pub fn high(&self) -> f64 {
        self.quantizer().high()
    }

    pub fn randomness(&self) -> f64 {
        self.generator().randomness()
    }
}
