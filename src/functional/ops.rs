//! Binding and similarity primitives for MAP hypervectors.
//!
//! Components are bipolar (`±1.0`), so binding is element-wise
//! multiplication and is its own inverse: `bind(bind(a, b), b) == a`.

use ndarray::{Array1, ArrayBase, Data, DataMut, Ix1, Zip};

/// Bind two hypervectors (element-wise product).
pub fn bind<S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> Array1<f32>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    assert_eq!(a.len(), b.len(), "bind requires equal dimensions");
    a * b
}

/// In-place binding: `acc ← acc ⊙ other`.
pub fn bind_assign<S1, S2>(acc: &mut ArrayBase<S1, Ix1>, other: &ArrayBase<S2, Ix1>)
where
    S1: DataMut<Elem = f32>,
    S2: Data<Elem = f32>,
{
    assert_eq!(acc.len(), other.len(), "bind requires equal dimensions");
    Zip::from(acc).and(other).for_each(|a, &b| *a *= b);
}

/// Dot product accumulated in f64.
pub fn dot<S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    assert_eq!(a.len(), b.len(), "dot requires equal dimensions");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum()
}

/// Cosine similarity in [-1, 1]. 1 = identical, 0 = orthogonal, -1 = negated.
/// Returns 0 when either vector is all-zero (e.g. a padding row).
pub fn cosine_similarity<S1, S2>(a: &ArrayBase<S1, Ix1>, b: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    assert_eq!(a.len(), b.len(), "similarity requires equal dimensions");
    let denom = (dot(a, a) * dot(b, b)).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}

/// p-norm of a vector (`p > 0`).
pub fn p_norm<S>(v: &ArrayBase<S, Ix1>, p: f32) -> f32
where
    S: Data<Elem = f32>,
{
    if p == 2.0 {
        return v.iter().map(|x| x * x).sum::<f32>().sqrt();
    }
    v.iter().map(|x| x.abs().powf(p)).sum::<f32>().powf(1.0 / p)
}

/// True when every component is exactly zero.
pub fn is_zero<S>(v: &ArrayBase<S, Ix1>) -> bool
where
    S: Data<Elem = f32>,
{
    v.iter().all(|&x| x == 0.0)
}
