//! Input-to-row quantizers.
//!
//! A quantizer turns one input element into a row index. Range checking
//! against the codebook is left to the table, so a quantizer may return an
//! index outside `[0, N)` only when its input was already an index.

use crate::error::{EmbeddingError, Result};

pub trait Quantizer: Send + Sync {
    type Input: Copy + Send + Sync;

    fn quantize(&self, value: Self::Input, num_embeddings: usize) -> Result<i64>;
}

/// Integer indices pass through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndexQuantizer;

impl Quantizer for IndexQuantizer {
    type Input = i64;

    fn quantize(&self, value: i64, _num_embeddings: usize) -> Result<i64> {
        Ok(value)
    }
}

/// Linear map of `[low, high]` onto the rows, saturating outside the domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelQuantizer {
    low: f64,
    high: f64,
}

impl LevelQuantizer {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        check_domain(low, high)?;
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Quantizer for LevelQuantizer {
    type Input = f64;

    fn quantize(&self, value: f64, num_embeddings: usize) -> Result<i64> {
        if value.is_nan() {
            return Err(EmbeddingError::NonFiniteInput(value));
        }
        let t = normalize(value, self.low, self.high);
        if t.is_nan() {
            return Err(EmbeddingError::NonFiniteInput(value));
        }
        Ok(clamp_index((t * num_embeddings as f64).floor(), num_embeddings))
    }
}

/// Periodic map of `[low, high)` onto the rows; inputs wrap with period
/// `high − low`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircularQuantizer {
    low: f64,
    high: f64,
}

impl CircularQuantizer {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        check_domain(low, high)?;
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Quantizer for CircularQuantizer {
    type Input = f64;

    fn quantize(&self, value: f64, num_embeddings: usize) -> Result<i64> {
        if !value.is_finite() {
            return Err(EmbeddingError::NonFiniteInput(value));
        }
        let t = normalize(value, self.low, self.high);
        if !t.is_finite() {
            return Err(EmbeddingError::NonFiniteInput(value));
        }
        let t = t.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative t.
        Ok(clamp_index((t * num_embeddings as f64).floor(), num_embeddings))
    }
}

fn check_domain(low: f64, high: f64) -> Result<()> {
    // A finite pair can still overflow its span (e.g. ±1e308).
    if !low.is_finite() || !high.is_finite() || low == high || !(high - low).is_finite() {
        return Err(EmbeddingError::InvalidDomain { low, high });
    }
    Ok(())
}

fn normalize(value: f64, low: f64, high: f64) -> f64 {
    (value - low) / (high - low)
}

fn clamp_index(index: f64, num_embeddings: usize) -> i64 {
    index.clamp(0.0, num_embeddings.saturating_sub(1) as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 10;

    #[test]
    fn test_index_passthrough() {
        assert_eq!(IndexQuantizer.quantize(3, N).unwrap(), 3);
        assert_eq!(IndexQuantizer.quantize(-1, N).unwrap(), -1);
    }

    #[test]
    fn test_invalid_domain_rejected() {
        assert!(LevelQuantizer::new(1.0, 1.0).is_err());
        assert!(LevelQuantizer::new(f64::NEG_INFINITY, 1.0).is_err());
        assert!(CircularQuantizer::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_level_bounds() {
        let q = LevelQuantizer::new(0.0, 1.0).unwrap();
        assert_eq!(q.quantize(0.0, N).unwrap(), 0);
        assert_eq!(q.quantize(1.0, N).unwrap(), (N - 1) as i64);
        assert_eq!(q.quantize(0.55, N).unwrap(), 5);
        assert_eq!(q.quantize(0.999, N).unwrap(), 9);
    }

    #[test]
    fn test_level_saturates() {
        let q = LevelQuantizer::new(-2.0, 2.0).unwrap();
        assert_eq!(q.quantize(-100.0, N).unwrap(), 0);
        assert_eq!(q.quantize(100.0, N).unwrap(), (N - 1) as i64);
        assert_eq!(q.quantize(f64::INFINITY, N).unwrap(), (N - 1) as i64);
        assert_eq!(q.quantize(f64::NEG_INFINITY, N).unwrap(), 0);
    }

    #[test]
    fn test_level_nan_rejected() {
        let q = LevelQuantizer::new(0.0, 1.0).unwrap();
        assert!(matches!(q.quantize(f64::NAN, N), Err(EmbeddingError::NonFiniteInput(_))));
    }

    #[test]
    fn test_circular_periodic() {
        let q = CircularQuantizer::new(-1.0, 3.0).unwrap();
        let base = q.quantize(-1.0, N).unwrap();
        assert_eq!(base, 0);
        for k in [-3.0, -1.0, 1.0, 2.0, 7.0] {
            assert_eq!(q.quantize(-1.0 + k * 4.0, N).unwrap(), base, "k = {}", k);
        }
        assert_eq!(q.quantize(0.5, N).unwrap(), q.quantize(4.5, N).unwrap());
    }

    #[test]
    fn test_circular_just_below_low_wraps_to_last() {
        let q = CircularQuantizer::new(0.0, 1.0).unwrap();
        assert_eq!(q.quantize(-1e-9, N).unwrap(), (N - 1) as i64);
        assert_eq!(q.quantize(-1e-300, N).unwrap(), (N - 1) as i64);
    }

    #[test]
    fn test_circular_high_wraps_to_first() {
        let q = CircularQuantizer::new(0.0, std::f64::consts::TAU).unwrap();
        assert_eq!(q.quantize(std::f64::consts::TAU, N).unwrap(), 0);
        assert_eq!(q.quantize(std::f64::consts::PI, N).unwrap(), 5);
    }

    #[test]
    fn test_overflowing_span_rejected() {
        let res = LevelQuantizer::new(-1e308, 1e308);
        assert!(matches!(res, Err(EmbeddingError::InvalidDomain { .. })));
        assert!(CircularQuantizer::new(f64::MAX, -f64::MAX).is_err());
        // Widest accepted span still maps its bounds to the end rows.
        let q = LevelQuantizer::new(-5e307, 5e307).unwrap();
        assert_eq!(q.quantize(-5e307, N).unwrap(), 0);
        assert_eq!(q.quantize(5e307, N).unwrap(), (N - 1) as i64);
        assert_eq!(q.quantize(0.0, N).unwrap(), 5);
    }

    #[test]
    fn test_circular_overflowing_input_rejected() {
        let q = CircularQuantizer::new(1e308, 1.5e308).unwrap();
        let res = q.quantize(-1.7e308, N);
        assert!(matches!(res, Err(EmbeddingError::NonFiniteInput(_))), "{:?}", res);
    }

    #[test]
    fn test_level_overflowing_input_saturates() {
        let q = LevelQuantizer::new(1e308, 1.5e308).unwrap();
        assert_eq!(q.quantize(-1.7e308, N).unwrap(), 0);
        assert_eq!(q.quantize(f64::MAX, N).unwrap(), (N - 1) as i64);
    }

    #[test]
    fn test_circular_non_finite_rejected() {
        let q = CircularQuantizer::new(0.0, 1.0).unwrap();
        assert!(q.quantize(f64::INFINITY, N).is_err());
        assert!(q.quantize(f64::NAN, N).is_err());
    }
}
