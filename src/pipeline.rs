//! Public entry points: build features, split, train, validate, chunk.
//!
//! ```no_run
//! use ig_chunker::fragment::{ChunkedFragment, UnchunkedFragment};
//! use ig_chunker::pipeline;
//! use ig_chunker::classifier::NaiveBayesParams;
//!
//! # fn main() -> anyhow::Result<()> {
//! let chunked = vec![
//!     ChunkedFragment::new("bylaws", "Members", Some("attribute"), "1"),
//!     ChunkedFragment::new("bylaws", "must", Some("deontic"), "1"),
//!     ChunkedFragment::new("bylaws", "pay dues", Some("aim"), "1"),
//! ];
//! let unchunked = vec![UnchunkedFragment::new("charter", "Officers must file reports")];
//!
//! let tables = pipeline::build_features(&chunked, &unchunked, 500, 2)?;
//! let split = pipeline::split_train_test(&tables.chunked, 0.8);
//! let model = pipeline::train_chunker(&split.training, &NaiveBayesParams::default())?;
//! let confusion = pipeline::validate(&model, &split.testing)?;
//! let spans = pipeline::chunk(&model, &tables.unchunked)?;
//! # Ok(())
//! # }
//! ```
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::classifier::{ClassifierError, NaiveBayes, NaiveBayesModel, NaiveBayesParams, TagModel, Trainer};
use crate::features::{ChunkedTable, FeatureBuilder, FeatureError, FeatureTables, UnchunkedTable};
use crate::fragment::{ChunkedFragment, UnchunkedFragment};
use crate::harness::{ContingencyTable, TrainTestSplit, stratified_split};
use crate::tagging::{ComponentSpan, PredictedToken, decode};

/// Seed used by [`split_train_test`].
pub const DEFAULT_SEED: u64 = 42;

/// Build the aligned chunked/unchunked feature tables with the rule annotator.
pub fn build_features(
    chunked: &[ChunkedFragment],
    unchunked: &[UnchunkedFragment],
    vocab_size: usize,
    window_size: usize,
) -> Result<FeatureTables, FeatureError> {
    FeatureBuilder::new(vocab_size, window_size).build(chunked, unchunked)
}

/// Stratified split with the default seed.
pub fn split_train_test(table: &ChunkedTable, train_fraction: f64) -> TrainTestSplit {
    split_train_test_seeded(table, train_fraction, DEFAULT_SEED)
}

pub fn split_train_test_seeded(table: &ChunkedTable, train_fraction: f64, seed: u64) -> TrainTestSplit {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    stratified_split(table, train_fraction, &mut rng)
}

/// Fit the built-in naive Bayes chunker.
pub fn train_chunker(
    training: &ChunkedTable,
    params: &NaiveBayesParams,
) -> Result<NaiveBayesModel, ClassifierError> {
    train_with(&NaiveBayes::new(params.clone()), training)
}

/// Fit any classifier implementing [`Trainer`].
pub fn train_with<T: Trainer>(trainer: &T, training: &ChunkedTable) -> Result<T::Model, ClassifierError> {
    let model = trainer.train(training)?;
    info!("Trained chunker on {} rows", training.len());
    Ok(model)
}

/// Cross-tabulate true against predicted tags on a held-out table.
pub fn validate<M: TagModel>(model: &M, testing: &ChunkedTable) -> Result<ContingencyTable, ClassifierError> {
    let predicted = model.predict(testing)?;
    let table = ContingencyTable::tabulate(
        testing
            .labels()
            .map(ToString::to_string)
            .zip(predicted),
    );
    info!("Validated on {} rows", table.total());
    Ok(table)
}

/// Predict tags for the unchunked table and rebuild component spans.
pub fn chunk<M: TagModel>(model: &M, unchunked: &UnchunkedTable) -> Result<Vec<ComponentSpan>, ClassifierError> {
    let predicted = model.predict(unchunked)?;
    let spans = decode_predictions(unchunked, &predicted);
    info!("Chunked {} tokens into {} spans", unchunked.len(), spans.len());
    Ok(spans)
}

/// Decode externally produced tags aligned with the rows of `unchunked`.
#[must_use]
pub fn decode_predictions<S: AsRef<str>>(unchunked: &UnchunkedTable, tags: &[S]) -> Vec<ComponentSpan> {
    decode(
        unchunked
            .labels()
            .zip(tags)
            .map(|(trace, tag)| PredictedToken {
                source: &trace.source,
                word: &trace.word,
                tag: tag.as_ref(),
            }),
    )
}
