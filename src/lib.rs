//! # ig-chunker — Institutional Grammar chunker
//!
//! Turns Institutional Grammar statements into a per-token sequence-tagging
//! problem and reconstructs structured statements from tagged text.
//!
//! Every token gets one composite tag joining its position in a statement
//! with its position in a component (attribute, deontic, aim, object, ...).
//! A generic multi-class classifier learns those tags from one-hot word / POS
//! features with lag and lead context, and the decoder folds predicted tags
//! back into component spans.
//!
//! ## Architecture
//!
//! - **[`config`]** — JSON configuration loading and validation
//! - **[`fragment`]** — Input fragment types (chunked / unchunked)
//! - **[`annotator`]** — Tokenizer + POS tagger trait, rule-based implementation
//! - **[`tagging`]** — Composite tag grammar, encoder and boundary-rule decoder
//! - **[`features`]** — Vocabulary reduction, context windows, one-hot schema, table builder
//! - **[`classifier`]** — Classifier traits and a categorical naive Bayes model
//! - **[`harness`]** — Stratified train/test split and contingency tables
//! - **[`pipeline`]** — The public entry points tying it all together
//! - **[`dataset`]** — CSV input/output

pub mod annotator;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod features;
pub mod fragment;
pub mod harness;
pub mod pipeline;
pub mod tagging;
