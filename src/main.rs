//! hdc-embed: inspect hyperdimensional embedding tables.
//!
//! Builds one embedding, prints the similarity of every row to row 0 and
//! the row selected for each input given on the command line.

use std::fmt::Debug;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use hdc_embeddings::config;
use hdc_embeddings::embeddings::{CodebookGenerator, EmbeddingTable, Quantizer};
use hdc_embeddings::functional::cosine_similarity;
use hdc_embeddings::{
    CircularEmbedding, IdentityEmbedding, LevelEmbedding, RandomEmbedding, ScalarEncoding,
    TableConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Identity,
    Random,
    Level,
    Circular,
}

/// Embedding inspection CLI.
#[derive(Parser, Debug)]
#[command(
    name = "hdc-embed",
    about = "Inspect identity, random, level and circular hypervector codebooks",
    version,
    allow_negative_numbers = true
)]
struct Cli {
    /// Codebook family.
    #[arg(short, long, value_enum, default_value_t = Kind::Level)]
    kind: Kind,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_NUM_EMBEDDINGS)]
    num_embeddings: usize,

    /// Hypervector dimension.
    #[arg(short = 'd', long, default_value_t = config::DEFAULT_EMBEDDING_DIM)]
    embedding_dim: usize,

    /// Lower input bound (level / circular).
    #[arg(long)]
    low: Option<f64>,

    /// Upper input bound (level / circular).
    #[arg(long)]
    high: Option<f64>,

    /// Randomness blend in [0, 1] (level / circular).
    #[arg(long, default_value_t = config::DEFAULT_RANDOMNESS)]
    randomness: f64,

    /// Row forced to zero; negative values count from the end.
    #[arg(long)]
    padding_idx: Option<isize>,

    /// Rescale returned rows to at most this norm.
    #[arg(long)]
    max_norm: Option<f32>,

    /// Order p of the norm used by --max-norm.
    #[arg(long, default_value_t = config::DEFAULT_NORM_TYPE)]
    norm_type: f32,

    /// Generation seed.
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Leading components to print per looked-up row.
    #[arg(long, default_value_t = 8)]
    show: usize,

    /// Inputs to look up: scalars for level / circular, indices otherwise.
    #[arg(trailing_var_arg = true)]
    inputs: Vec<f64>,
}

impl Cli {
    fn table_config(&self) -> TableConfig {
        let mut cfg = TableConfig::new(self.num_embeddings, self.embedding_dim).with_seed(self.seed);
        cfg.padding_idx = self.padding_idx;
        if let Some(max_norm) = self.max_norm {
            cfg = cfg.with_max_norm(max_norm, self.norm_type);
        }
        cfg
    }

    fn encoding(&self, default: ScalarEncoding) -> ScalarEncoding {
        default
            .with_domain(self.low.unwrap_or(default.low), self.high.unwrap_or(default.high))
            .with_randomness(self.randomness)
    }

    fn indices(&self) -> anyhow::Result<Vec<i64>> {
        self.inputs
            .iter()
            .map(|&x| {
                if x.fract() != 0.0 {
                    bail!("{:?} embeddings take integer indices, got {}", self.kind, x);
                }
                Ok(x as i64)
            })
            .collect()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::info!("hdc-embed v{}", env!("CARGO_PKG_VERSION"));

    let cfg = cli.table_config();
    match cli.kind {
        Kind::Identity => {
            let table = IdentityEmbedding::with_config(cfg).context("building identity embedding")?;
            report(&table, &cli.indices()?, cli.show)
        }
        Kind::Random => {
            let table = RandomEmbedding::with_config(cfg).context("building random embedding")?;
            report(&table, &cli.indices()?, cli.show)
        }
        Kind::Level => {
            let encoding = cli.encoding(ScalarEncoding::level());
            let table = LevelEmbedding::with_config(cfg, encoding).context("building level embedding")?;
            tracing::info!("Domain: [{}, {}], randomness={}", table.low(), table.high(), table.randomness());
            report(&table, &cli.inputs, cli.show)
        }
        Kind::Circular => {
            let encoding = cli.encoding(ScalarEncoding::circular());
            let table =
                CircularEmbedding::with_config(cfg, encoding).context("building circular embedding")?;
            tracing::info!("Period: [{}, {}), randomness={}", table.low(), table.high(), table.randomness());
            report(&table, &cli.inputs, cli.show)
        }
    }
}

fn report<G, Q>(table: &EmbeddingTable<G, Q>, inputs: &[Q::Input], show: usize) -> anyhow::Result<()>
where
    G: CodebookGenerator,
    Q: Quantizer,
    Q::Input: Debug,
{
    tracing::info!(
        "Codebook: kind={}, {} x {}, padding={:?}",
        table.kind(),
        table.num_embeddings(),
        table.embedding_dim(),
        table.padding_idx(),
    );

    println!("row  sim(row, 0)");
    let anchor = table.weight().row(0);
    for i in 0..table.num_embeddings() {
        let s = cosine_similarity(&anchor, &table.weight().row(i));
        println!("{:>3}  {:+.4}", i, s);
    }

    for &x in inputs {
        let idx = table.index_of(x)?;
        let row = table.forward_one(x)?;
        let head: Vec<String> = row.iter().take(show).map(|v| format!("{:+.2}", v)).collect();
        println!("{:?} -> row {} [{} ...]", x, idx, head.join(" "));
    }
    Ok(())
}
