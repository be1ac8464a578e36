//! Hypervector generation and similarity algebra.
//!
//! Hypervectors follow the MAP model:
//! - **bipolar components** (`±1.0`) stored as `f32`
//! - **multiplicative binding**, self-inverse
//! - **cosine similarity** for comparison

pub mod generators;
pub mod ops;

pub use generators::{circular_hv, identity_hv, level_hv, random_hv};
pub use ops::{bind, bind_assign, cosine_similarity, dot, is_zero, p_norm};
