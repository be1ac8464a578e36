//! Generic embedding table.
//!
//! Owns an N×D codebook, a [`CodebookGenerator`] that fills it and a
//! [`Quantizer`] that maps inputs to rows:
//! - **reset**: generator overwrites the storage, then the padding row is zeroed
//! - **lookup**: integer indices → rows, output shape `indices.shape + [D]`
//! - **forward**: quantize each input element, then lookup
//!
//! Lookups never mutate the codebook. `max_norm` rescales returned rows only.

use ndarray::{Array1, Array2, ArrayD, ArrayView1, ArrayViewD, IxDyn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::embeddings::generator::{CodebookGenerator, CodebookKind};
use crate::embeddings::quantizer::Quantizer;
use crate::error::{EmbeddingError, Result};
use crate::functional::p_norm;

/// Shape and lookup options shared by every embedding variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Number of rows (N).
    pub num_embeddings: usize,

    /// Hypervector dimension (D).
    pub embedding_dim: usize,

    /// Row forced to zero after every reset. Negative values count from the end.
    pub padding_idx: Option<isize>,

    /// Rows returned by a lookup are rescaled to at most this norm.
    ///
    /// Only the returned copies are rescaled. The stored codebook is never
    /// renormalized, unlike tables that rewrite looked-up weight rows in
    /// place, so repeated lookups always start from the generated rows.
    pub max_norm: Option<f32>,

    /// Order p of the norm used with `max_norm`.
    pub norm_type: f32,

    /// Seed of the table's generation stream.
    pub seed: u64,
}

impl TableConfig {
    pub fn new(num_embeddings: usize, embedding_dim: usize) -> Self {
        Self {
            num_embeddings,
            embedding_dim,
            ..Default::default()
        }
    }

    pub fn with_padding_idx(mut self, padding_idx: isize) -> Self {
        self.padding_idx = Some(padding_idx);
        self
    }

    pub fn with_max_norm(mut self, max_norm: f32, norm_type: f32) -> Self {
        self.max_norm = Some(max_norm);
        self.norm_type = norm_type;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration and resolve the padding index to a row.
    pub fn validate(&self) -> Result<Option<usize>> {
        if self.num_embeddings == 0 || self.embedding_dim == 0 {
            return Err(EmbeddingError::EmptyCodebook {
                num_embeddings: self.num_embeddings,
                embedding_dim: self.embedding_dim,
            });
        }

        let norm_ok = self.norm_type > 0.0 && self.max_norm.map_or(true, |m| m > 0.0);
        if !norm_ok {
            return Err(EmbeddingError::InvalidNorm {
                max_norm: self.max_norm,
                norm_type: self.norm_type,
            });
        }

        match self.padding_idx {
            None => Ok(None),
            Some(idx) => {
                let n = self.num_embeddings as isize;
                if idx >= n || idx < -n {
                    return Err(EmbeddingError::PaddingIndexOutOfRange {
                        padding_idx: idx,
                        num_embeddings: self.num_embeddings,
                    });
                }
                Ok(Some(if idx < 0 { (idx + n) as usize } else { idx as usize }))
            }
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_embeddings: config::DEFAULT_NUM_EMBEDDINGS,
            embedding_dim: config::DEFAULT_EMBEDDING_DIM,
            padding_idx: None,
            max_norm: None,
            norm_type: config::DEFAULT_NORM_TYPE,
            seed: config::DEFAULT_SEED,
        }
    }
}

/// An embedding table parameterised by its generation and quantization strategies.
pub struct EmbeddingTable<G, Q> {
    weight: Array2<f32>,
    config: TableConfig,
    padding_idx: Option<usize>,
    generator: G,
    quantizer: Q,
    rng: StdRng,
}

impl<G: CodebookGenerator, Q: Quantizer> EmbeddingTable<G, Q> {
    /// Build a table and run the reset hook once.
    pub fn from_parts(config: TableConfig, generator: G, quantizer: Q) -> Result<Self> {
        let padding_idx = config.validate()?;
        let mut table = Self {
            weight: Array2::zeros((config.num_embeddings, config.embedding_dim)),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            padding_idx,
            generator,
            quantizer,
        };
        table.reset_parameters()?;
        Ok(table)
    }

    /// Regenerate the codebook from the next draw of the table's stream.
    pub fn reset_parameters(&mut self) -> Result<()> {
        self.generator
            .generate(&mut self.weight.view_mut(), &mut self.rng)?;
        self.fill_padding_idx_with_zero();

        tracing::debug!(
            kind = %self.generator.kind(),
            num_embeddings = self.config.num_embeddings,
            embedding_dim = self.config.embedding_dim,
            padding_idx = ?self.padding_idx,
            "codebook reset"
        );
        Ok(())
    }

    /// Restart the generation stream from `seed` and reset.
    pub fn reseed(&mut self, seed: u64) -> Result<()> {
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.reset_parameters()
    }

    fn fill_padding_idx_with_zero(&mut self) {
        if let Some(idx) = self.padding_idx {
            self.weight.row_mut(idx).fill(0.0);
        }
    }

    /// Gather rows for integer indices of any shape.
    pub fn lookup(&self, indices: ArrayViewD<'_, i64>) -> Result<ArrayD<f32>> {
        let rows = indices
            .iter()
            .map(|&i| self.check_index(i))
            .collect::<Result<Vec<usize>>>()?;
        self.gather(indices.shape(), &rows)
    }

    /// Quantize every input element, then gather the rows.
    pub fn forward(&self, input: ArrayViewD<'_, Q::Input>) -> Result<ArrayD<f32>> {
        let rows = input
            .iter()
            .map(|&x| self.index_of(x))
            .collect::<Result<Vec<usize>>>()?;
        tracing::trace!(elements = rows.len(), kind = %self.kind(), "forward");
        self.gather(input.shape(), &rows)
    }

    /// Forward a single input element.
    pub fn forward_one(&self, value: Q::Input) -> Result<Array1<f32>> {
        let idx = self.index_of(value)?;
        let mut row = self.weight.row(idx).to_owned();
        if let Some(slice) = row.as_slice_mut() {
            self.apply_max_norm(slice);
        }
        Ok(row)
    }

    /// Row selected for one input element.
    pub fn index_of(&self, value: Q::Input) -> Result<usize> {
        let idx = self.quantizer.quantize(value, self.config.num_embeddings)?;
        self.check_index(idx)
    }

    fn check_index(&self, index: i64) -> Result<usize> {
        if index < 0 || index as u64 >= self.config.num_embeddings as u64 {
            return Err(EmbeddingError::IndexOutOfRange {
                index,
                num_embeddings: self.config.num_embeddings,
            });
        }
        Ok(index as usize)
    }

    fn gather(&self, shape: &[usize], rows: &[usize]) -> Result<ArrayD<f32>> {
        let dim = self.config.embedding_dim;
        let mut data = vec![0.0f32; rows.len() * dim];

        data.par_chunks_mut(dim)
            .zip(rows.par_iter())
            .for_each(|(chunk, &idx)| {
                for (dst, &src) in chunk.iter_mut().zip(self.weight.row(idx).iter()) {
                    *dst = src;
                }
                self.apply_max_norm(chunk);
            });

        let mut out_shape = shape.to_vec();
        out_shape.push(dim);
        ArrayD::from_shape_vec(IxDyn(&out_shape), data)
            .map_err(|e| EmbeddingError::InvalidShape(e.to_string()))
    }

    fn apply_max_norm(&self, row: &mut [f32]) {
        let Some(max_norm) = self.config.max_norm else {
            return;
        };
        let norm = p_norm(&ArrayView1::from(&row[..]), self.config.norm_type);
        if norm > max_norm {
            let scale = max_norm / (norm + 1e-7);
            row.iter_mut().for_each(|v| *v *= scale);
        }
    }

    /// The codebook.
    pub fn weight(&self) -> &Array2<f32> {
        &self.weight
    }

    pub fn row(&self, index: usize) -> Result<ArrayView1<'_, f32>> {
        let idx = self.check_index(index as i64)?;
        Ok(self.weight.row(idx))
    }

    pub fn num_embeddings(&self) -> usize {
        self.config.num_embeddings
    }

    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Resolved (non-negative) padding row.
    pub fn padding_idx(&self) -> Option<usize> {
        self.padding_idx
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn kind(&self) -> CodebookKind {
        self.generator.kind()
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn quantizer(&self) -> &Q {
        &self.quantizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::generator::{IdentityGenerator, RandomGenerator};
    use crate::embeddings::quantizer::IndexQuantizer;
    use crate::functional::is_zero;
    use ndarray::{arr0, array};

    fn random_table(config: TableConfig) -> EmbeddingTable<RandomGenerator, IndexQuantizer> {
        EmbeddingTable::from_parts(config, RandomGenerator, IndexQuantizer).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.embedding_dim, config::DEFAULT_EMBEDDING_DIM);
        assert_eq!(cfg.norm_type, 2.0);
        assert!(cfg.padding_idx.is_none());
        assert_eq!(cfg.validate().unwrap(), None);
    }

    #[test]
    fn test_empty_codebook_rejected() {
        let res = EmbeddingTable::from_parts(TableConfig::new(0, 8), RandomGenerator, IndexQuantizer);
        assert!(matches!(res, Err(EmbeddingError::EmptyCodebook { .. })));
        let res = EmbeddingTable::from_parts(TableConfig::new(8, 0), RandomGenerator, IndexQuantizer);
        assert!(matches!(res, Err(EmbeddingError::EmptyCodebook { .. })));
    }

    #[test]
    fn test_padding_index_resolution() {
        assert_eq!(TableConfig::new(5, 4).with_padding_idx(2).validate().unwrap(), Some(2));
        assert_eq!(TableConfig::new(5, 4).with_padding_idx(-1).validate().unwrap(), Some(4));
        assert_eq!(TableConfig::new(5, 4).with_padding_idx(-5).validate().unwrap(), Some(0));
        for bad in [5, -6] {
            let err = TableConfig::new(5, 4).with_padding_idx(bad).validate().unwrap_err();
            assert!(matches!(err, EmbeddingError::PaddingIndexOutOfRange { .. }));
        }
    }

    #[test]
    fn test_invalid_norm_rejected() {
        let cfg = TableConfig::new(4, 4).with_max_norm(-1.0, 2.0);
        assert!(matches!(cfg.validate(), Err(EmbeddingError::InvalidNorm { .. })));
        let cfg = TableConfig::new(4, 4).with_max_norm(1.0, 0.0);
        assert!(matches!(cfg.validate(), Err(EmbeddingError::InvalidNorm { .. })));
    }

    #[test]
    fn test_padding_row_zero_after_reset() {
        let mut table = random_table(TableConfig::new(6, 64).with_padding_idx(-2));
        assert_eq!(table.padding_idx(), Some(4));
        assert!(is_zero(&table.weight().row(4)));
        for _ in 0..3 {
            table.reset_parameters().unwrap();
            assert!(is_zero(&table.weight().row(4)));
            assert!(!is_zero(&table.weight().row(3)));
        }
    }

    #[test]
    fn test_reset_draws_new_codebook() {
        let mut table = random_table(TableConfig::new(4, 128));
        let before = table.weight().clone();
        table.reset_parameters().unwrap();
        assert_ne!(&before, table.weight());
    }

    #[test]
    fn test_reseed_reproduces_construction() {
        let cfg = TableConfig::new(4, 128).with_seed(17);
        let fresh = random_table(cfg.clone());
        let mut table = random_table(cfg.with_seed(3));
        table.reseed(17).unwrap();
        assert_eq!(fresh.weight(), table.weight());
        assert_eq!(table.config().seed, 17);
    }

    #[test]
    fn test_lookup_shapes() {
        let table = random_table(TableConfig::new(5, 16));
        let batch = table.lookup(array![0i64, 3, 4].into_dyn().view()).unwrap();
        assert_eq!(batch.shape(), &[3, 16]);

        let grid = table.lookup(array![[0i64, 1], [2, 3]].into_dyn().view()).unwrap();
        assert_eq!(grid.shape(), &[2, 2, 16]);

        let scalar = table.lookup(arr0(2i64).into_dyn().view()).unwrap();
        assert_eq!(scalar.shape(), &[16]);
    }

    #[test]
    fn test_lookup_rows_match_codebook() {
        let table = random_table(TableConfig::new(5, 16));
        let out = table.lookup(array![4i64, 1].into_dyn().view()).unwrap();
        let out = out.into_dimensionality::<ndarray::Ix2>().unwrap();
        assert_eq!(out.row(0), table.weight().row(4));
        assert_eq!(out.row(1), table.weight().row(1));
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = random_table(TableConfig::new(5, 16));
        for bad in [-1i64, 5, 100] {
            let err = table.lookup(array![0i64, bad].into_dyn().view()).unwrap_err();
            assert_eq!(
                err,
                EmbeddingError::IndexOutOfRange {
                    index: bad,
                    num_embeddings: 5
                }
            );
        }
        assert!(table.row(5).is_err());
    }

    #[test]
    fn test_lookup_empty_batch() {
        let table = random_table(TableConfig::new(5, 16));
        let empty: Array1<i64> = Array1::zeros(0);
        let out = table.lookup(empty.into_dyn().view()).unwrap();
        assert_eq!(out.shape(), &[0, 16]);
    }

    #[test]
    fn test_max_norm_rescales_output_only() {
        let dim = 16;
        let table = EmbeddingTable::from_parts(
            TableConfig::new(3, dim).with_max_norm(1.0, 2.0),
            IdentityGenerator,
            IndexQuantizer,
        )
        .unwrap();
        let row = table.forward_one(1).unwrap();
        let norm = p_norm(&row, 2.0);
        assert!((norm - 1.0).abs() < 1e-4, "norm = {}", norm);
        // Codebook keeps its original norm of sqrt(dim).
        let stored = p_norm(&table.weight().row(1), 2.0);
        assert!((stored - (dim as f32).sqrt()).abs() < 1e-4);

        let batch = table.lookup(array![0i64, 2].into_dyn().view()).unwrap();
        let batch = batch.into_dimensionality::<ndarray::Ix2>().unwrap();
        for r in batch.rows() {
            assert!((p_norm(&r, 2.0) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_max_norm_leaves_small_rows() {
        let table = EmbeddingTable::from_parts(
            TableConfig::new(3, 4).with_max_norm(10.0, 2.0),
            IdentityGenerator,
            IndexQuantizer,
        )
        .unwrap();
        assert_eq!(table.forward_one(0).unwrap(), Array1::from_elem(4, 1.0f32));
    }

    #[test]
    fn test_table_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EmbeddingTable<RandomGenerator, IndexQuantizer>>();
    }
}
