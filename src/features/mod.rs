//! Feature extraction: vocabulary reduction, context windows, one-hot schema
//! and the builder that ties them to the tag encoder.
pub mod builder;
pub mod schema;
pub mod table;
pub mod vocab;
pub mod window;

use thiserror::Error;

use crate::annotator::AnnotatorError;

pub use builder::{DEFAULT_SEPARATOR, FeatureBuilder, FeatureTables};
pub use schema::{INDICATOR_SEPARATOR, OneHotSchema};
pub use table::{ChunkedTable, FeatureRow, FeatureTable, TokenTrace, UnchunkedTable};
pub use vocab::{OOV_MARKER, Vocabulary, reduce_vocabulary};

/// Errors raised while building feature tables.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("reserved separator {separator:?} found in text of source {document}")]
    ReservedSeparator { document: String, separator: char },

    #[error("tokenizer did not preserve unit separators: expected {expected} units, found {found}")]
    Misaligned { expected: usize, found: usize },

    #[error(transparent)]
    Annotator(#[from] AnnotatorError),
}
