use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ig_chunker::config::Config;
use ig_chunker::dataset;
use ig_chunker::features::FeatureBuilder;
use ig_chunker::pipeline;

#[derive(Parser)]
#[command(name = "ig-chunker", version, about = "Institutional Grammar statement chunker")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, short, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build and export the chunked and unchunked feature tables
    Features(Inputs),
    /// Build features, train, validate and chunk the unchunked text
    Run {
        #[command(flatten)]
        inputs: Inputs,
        /// Fraction of each tag's rows used for training
        #[arg(long)]
        train_fraction: Option<f64>,
        /// Seed for the stratified split
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct Inputs {
    /// CSV with columns source,text,component,statement_ID
    #[arg(long)]
    chunked: PathBuf,
    /// CSV with columns source,text
    #[arg(long)]
    unchunked: PathBuf,
    /// Output directory (overrides config)
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    vocab_size: Option<usize>,
    #[arg(long)]
    window_size: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 1. Load config
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Command::Features(inputs) => {
            let out_dir = apply_overrides(&mut config, &inputs)?;
            config.validate()?;
            features(&config, &inputs, &out_dir)
        }
        Command::Run {
            inputs,
            train_fraction,
            seed,
        } => {
            let out_dir = apply_overrides(&mut config, &inputs)?;
            if let Some(fraction) = train_fraction {
                config.train_fraction = fraction;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.validate()?;
            run(&config, &inputs, &out_dir)
        }
    }
}

fn apply_overrides(config: &mut Config, inputs: &Inputs) -> Result<PathBuf> {
    if let Some(k) = inputs.vocab_size {
        config.vocab_size = k;
    }
    if let Some(w) = inputs.window_size {
        config.window_size = w;
    }
    let out_dir = inputs
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    Ok(out_dir)
}

fn build(config: &Config, inputs: &Inputs) -> Result<ig_chunker::features::FeatureTables> {
    let chunked = dataset::read_chunked(&inputs.chunked)?;
    let unchunked = dataset::read_unchunked(&inputs.unchunked)?;
    let tables = FeatureBuilder::new(config.vocab_size, config.window_size)
        .separator(config.separator)
        .build(&chunked, &unchunked)
        .context("failed to build feature tables")?;
    Ok(tables)
}

fn features(config: &Config, inputs: &Inputs, out_dir: &Path) -> Result<()> {
    let tables = build(config, inputs)?;
    dataset::save_table(&out_dir.join("chunked_features.csv"), &tables.chunked)?;
    dataset::save_table(&out_dir.join("unchunked_features.csv"), &tables.unchunked)?;
    info!("Wrote feature tables to {}", out_dir.display());
    Ok(())
}

fn run(config: &Config, inputs: &Inputs, out_dir: &Path) -> Result<()> {
    // 2. Features
    let tables = build(config, inputs)?;

    // 3. Split + train
    let split = pipeline::split_train_test_seeded(&tables.chunked, config.train_fraction, config.seed);
    let model = pipeline::train_chunker(&split.training, &config.classifier)
        .context("failed to train chunker")?;
    info!(
        "Model covers {} tags ({} training rows, {} held out)",
        model.classes().len(),
        split.training.len(),
        split.testing.len()
    );

    // 4. Validate
    if split.testing.is_empty() {
        info!("No held-out rows; skipping validation");
    } else {
        let contingency = pipeline::validate(&model, &split.testing)?;
        dataset::save_contingency(&out_dir.join("contingency.csv"), &contingency)?;
        eprintln!("{contingency}");
    }

    // 5. Chunk
    let spans = pipeline::chunk(&model, &tables.unchunked)?;
    dataset::save_spans(&out_dir.join("statements.csv"), &spans)?;
    info!("Wrote {} spans to {}", spans.len(), out_dir.display());
    Ok(())
}
