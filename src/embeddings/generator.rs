//! Codebook generation strategies plugged into [`EmbeddingTable`].
//!
//! [`EmbeddingTable`]: crate::embeddings::table::EmbeddingTable

use std::fmt;

use ndarray::ArrayViewMut2;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::functional::{self, generators::check_randomness};

/// The four codebook families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodebookKind {
    Identity,
    Random,
    Level,
    Circular,
}

impl CodebookKind {
    /// All kinds in standard order.
    pub fn all() -> [CodebookKind; 4] {
        [
            CodebookKind::Identity,
            CodebookKind::Random,
            CodebookKind::Level,
            CodebookKind::Circular,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CodebookKind::Identity => "identity",
            CodebookKind::Random => "random",
            CodebookKind::Level => "level",
            CodebookKind::Circular => "circular",
        }
    }
}

impl fmt::Display for CodebookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fills a table's backing storage in place.
///
/// The generator is not padding-aware; the table zeroes its padding row
/// after every call.
pub trait CodebookGenerator: Send + Sync {
    fn kind(&self) -> CodebookKind;

    /// Overwrite every row of `out`.
    fn generate(&self, out: &mut ArrayViewMut2<f32>, rng: &mut StdRng) -> Result<()>;
}

/// Identity hypervector in every row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdentityGenerator;

impl CodebookGenerator for IdentityGenerator {
    fn kind(&self) -> CodebookKind {
        CodebookKind::Identity
    }

    fn generate(&self, out: &mut ArrayViewMut2<f32>, _rng: &mut StdRng) -> Result<()> {
        let (rows, dim) = out.dim();
        functional::identity_hv(rows, dim, out)
    }
}

/// Independent random hypervectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RandomGenerator;

impl CodebookGenerator for RandomGenerator {
    fn kind(&self) -> CodebookKind {
        CodebookKind::Random
    }

    fn generate(&self, out: &mut ArrayViewMut2<f32>, rng: &mut StdRng) -> Result<()> {
        let (rows, dim) = out.dim();
        functional::random_hv(rows, dim, rng, out)
    }
}

/// Level codebook with a randomness blend in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelGenerator {
    randomness: f64,
}

impl LevelGenerator {
    pub fn new(randomness: f64) -> Result<Self> {
        check_randomness(randomness)?;
        Ok(Self { randomness })
    }

    pub fn randomness(&self) -> f64 {
        self.randomness
    }
}

impl CodebookGenerator for LevelGenerator {
    fn kind(&self) -> CodebookKind {
        CodebookKind::Level
    }

    fn generate(&self, out: &mut ArrayViewMut2<f32>, rng: &mut StdRng) -> Result<()> {
        let (rows, dim) = out.dim();
        functional::level_hv(rows, dim, self.randomness, rng, out)
    }
}

/// Circular codebook with a randomness blend in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularGenerator {
    randomness: f64,
}

impl CircularGenerator {
    pub fn new(randomness: f64) -> Result<Self> {
        check_randomness(randomness)?;
        Ok(Self { randomness })
    }

    pub fn randomness(&self) -> f64 {
        self.randomness
    }
}

impl CodebookGenerator for CircularGenerator {
    fn kind(&self) -> CodebookKind {
        CodebookKind::Circular
    }

    fn generate(&self, out: &mut ArrayViewMut2<f32>, rng: &mut StdRng) -> Result<()> {
        let (rows, dim) = out.dim();
        functional::circular_hv(rows, dim, self.randomness, rng, out)
    }
}
