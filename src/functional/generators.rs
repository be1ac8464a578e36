//! Codebook generators.
//!
//! Each generator fills a caller-provided `num_rows × dim` buffer in place:
//! - `identity_hv`: the binding identity (all `+1`) in every row
//! - `random_hv`: independent bipolar rows, pairwise near-orthogonal
//! - `level_hv`: rows whose similarity falls off with |i − j|
//! - `circular_hv`: like `level_hv`, but on a ring: row N−1 neighbours row 0
//!
//! Level and circular codebooks interpolate between random endpoint vectors.
//! Every component draws a threshold in [0, 1); a row at fraction `f` of a
//! span keeps the start endpoint's component while `threshold < 1 − f`.
//! `randomness` shortens the spans: 0 gives a single span across the whole
//! codebook, 1 makes every row its own independent endpoint.

use ndarray::{s, Array2, ArrayViewMut2, Axis, Zip};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::ops::{bind, bind_assign};
use crate::error::{EmbeddingError, Result};

/// Fill `out` with the identity hypervector in every row.
pub fn identity_hv(num_rows: usize, dim: usize, out: &mut ArrayViewMut2<f32>) -> Result<()> {
    check_shape(num_rows, dim, out)?;
    out.fill(1.0);
    Ok(())
}

/// Fill `out` with independent random bipolar hypervectors.
pub fn random_hv<R: Rng + ?Sized>(
    num_rows: usize,
    dim: usize,
    rng: &mut R,
    out: &mut ArrayViewMut2<f32>,
) -> Result<()> {
    check_shape(num_rows, dim, out)?;
    fill_bipolar(out, rng);
    Ok(())
}

/// Fill `out` with a level codebook.
pub fn level_hv<R: Rng + ?Sized>(
    num_rows: usize,
    dim: usize,
    randomness: f64,
    rng: &mut R,
    out: &mut ArrayViewMut2<f32>,
) -> Result<()> {
    check_shape(num_rows, dim, out)?;
    check_randomness(randomness)?;
    fill_levels(out, randomness, rng);
    Ok(())
}

/// Fill `out` with a circular codebook.
///
/// Odd row counts are generated on a ring of twice the resolution and
/// every other row is kept, so the spacing stays uniform around the ring.
pub fn circular_hv<R: Rng + ?Sized>(
    num_rows: usize,
    dim: usize,
    randomness: f64,
    rng: &mut R,
    out: &mut ArrayViewMut2<f32>,
) -> Result<()> {
    check_shape(num_rows, dim, out)?;
    check_randomness(randomness)?;

    if num_rows % 2 == 0 {
        fill_ring(out, randomness, rng);
    } else {
        let mut doubled = Array2::<f32>::zeros((2 * num_rows, dim));
        fill_ring(&mut doubled.view_mut(), randomness, rng);
        out.assign(&doubled.slice(s![..;2, ..]));
    }
    Ok(())
}

fn check_shape(num_rows: usize, dim: usize, out: &ArrayViewMut2<f32>) -> Result<()> {
    let actual = out.dim();
    if actual != (num_rows, dim) {
        return Err(EmbeddingError::ShapeMismatch {
            expected: (num_rows, dim),
            actual,
        });
    }
    Ok(())
}

pub(crate) fn check_randomness(randomness: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&randomness) {
        return Err(EmbeddingError::InvalidRandomness(randomness));
    }
    Ok(())
}

fn fill_bipolar<R: Rng + ?Sized>(out: &mut ArrayViewMut2<f32>, rng: &mut R) {
    out.mapv_inplace(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 });
}

/// Span interpolation shared by level and circular codebooks.
fn fill_levels<R: Rng + ?Sized>(out: &mut ArrayViewMut2<f32>, randomness: f64, rng: &mut R) {
    let (num_rows, dim) = out.dim();
    if num_rows == 0 {
        return;
    }
    if num_rows == 1 {
        fill_bipolar(out, rng);
        return;
    }

    let steps = (num_rows - 1) as f64;
    let levels_per_span = (1.0 - randomness) * steps + randomness;
    let spans = ((steps / levels_per_span).ceil() as usize).max(1);

    let mut endpoints = Array2::<f32>::zeros((spans + 1, dim));
    fill_bipolar(&mut endpoints.view_mut(), rng);

    let unit = Uniform::new(0.0f64, 1.0);
    let thresholds = Array2::from_shape_simple_fn((spans, dim), || unit.sample(&mut *rng));

    for (i, mut row) in out.axis_iter_mut(Axis(0)).enumerate() {
        let position = i as f64 / levels_per_span;
        let mut span = position.floor() as usize;
        let mut fraction = position - span as f64;
        // The last level sits on the end of the final span.
        if span >= spans {
            span = spans - 1;
            fraction = 1.0;
        }
        let keep_start = 1.0 - fraction;

        Zip::from(&mut row)
            .and(&endpoints.row(span))
            .and(&endpoints.row(span + 1))
            .and(&thresholds.row(span))
            .for_each(|v, &start, &end, &t| *v = if t < keep_start { start } else { end });
    }
}

/// Ring construction for an even number of rows.
///
/// Rows `0..=n/2` are a level sequence. Walking on from the half-way row,
/// each step re-applies the difference recorded at the matching step of the
/// first half, which flips those components back towards row 0.
fn fill_ring<R: Rng + ?Sized>(out: &mut ArrayViewMut2<f32>, randomness: f64, rng: &mut R) {
    let num_rows = out.nrows();
    if num_rows == 0 {
        return;
    }
    let half = num_rows / 2;

    fill_levels(&mut out.slice_mut(s![..=half, ..]), randomness, rng);

    for m in 1..half {
        let step = bind(&out.row(m - 1), &out.row(m));
        let mut next = out.row(half + m - 1).to_owned();
        bind_assign(&mut next, &step);
        out.row_mut(half + m).assign(&next);
    }
}
