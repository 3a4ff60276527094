/// Classifier traits and shared types.
///
/// The chunker treats the classifier as a generic multi-class model: classes
/// are opaque strings, features are the one-hot indicators of a
/// [`FeatureTable`]. Anything implementing [`Trainer`] / [`TagModel`] can be
/// plugged into the pipeline.
pub mod naive_bayes;

use thiserror::Error;

use crate::features::{ChunkedTable, FeatureTable};

pub use naive_bayes::{NaiveBayes, NaiveBayesModel, NaiveBayesParams};

/// Errors that can occur during training or prediction.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("training table has no rows")]
    EmptyTrainingSet,

    #[error("feature width mismatch: model expects {expected} indicators, table has {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("invalid classifier parameters: {0}")]
    InvalidParams(String),
}

/// Something that can fit a model on a tagged feature table.
pub trait Trainer {
    type Model: TagModel;

    fn train(&self, table: &ChunkedTable) -> Result<Self::Model, ClassifierError>;
}

/// A fitted model predicting one class per row, in row order.
pub trait TagModel {
    fn predict<L>(&self, table: &FeatureTable<L>) -> Result<Vec<String>, ClassifierError>;
}
