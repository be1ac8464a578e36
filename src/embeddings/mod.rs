//! Hyperdimensional embedding tables.
//!
//! One generic [`EmbeddingTable`] composed with two strategies:
//! - a **generator** that fills the codebook on every reset
//! - a **quantizer** that maps an input element to a row
//!
//! The four variants are type aliases over that table.

pub mod generator;
pub mod quantizer;
pub mod table;
pub mod variants;

pub use generator::{
    CircularGenerator, CodebookGenerator, CodebookKind, IdentityGenerator, LevelGenerator,
    RandomGenerator,
};
pub use quantizer::{CircularQuantizer, IndexQuantizer, LevelQuantizer, Quantizer};
pub use table::{EmbeddingTable, TableConfig};
pub use variants::{
    CircularEmbedding, IdentityEmbedding, LevelEmbedding, RandomEmbedding, ScalarEncoding,
};
