//! Feature table builder.
//!
//! Tokenizes chunked and unchunked fragments, reduces the vocabulary over both,
//! encodes tags for the chunked side, adds lag/lead context per
//! `(partition, source)` and one-hot encodes everything against a single
//! schema. Each partition is tokenized as one string with a reserved separator
//! between fragments; a token's fragment is the number of separators seen
//! before it.
use std::sync::Arc;

use tracing::{debug, info};

use super::schema::OneHotSchema;
use super::table::{ChunkedTable, FeatureRow, TokenTrace, UnchunkedTable};
use super::vocab::reduce_vocabulary;
use super::{FeatureError, window};
use crate::annotator::{Annotator, RuleAnnotator, TokenKind};
use crate::fragment::{ChunkedFragment, UnchunkedFragment};
use crate::tagging::encode_fragments;

/// Reserved character placed between fragments before tokenization.
pub const DEFAULT_SEPARATOR: char = '¶';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Partition {
    Chunked,
    Unchunked,
}

#[derive(Debug, Clone)]
struct UnitToken {
    unit: usize,
    surface: String,
    pos: String,
}

/// The two aligned tables produced by [`FeatureBuilder::build`].
#[derive(Debug, Clone)]
pub struct FeatureTables {
    pub chunked: ChunkedTable,
    pub unchunked: UnchunkedTable,
}

pub struct FeatureBuilder<A = RuleAnnotator> {
    annotator: A,
    vocab_size: usize,
    window_size: usize,
    separator: char,
}

impl FeatureBuilder<RuleAnnotator> {
    /// Builder backed by the built-in rule annotator.
    pub fn new(vocab_size: usize, window_size: usize) -> Self {
        Self::with_annotator(RuleAnnotator::new(), vocab_size, window_size)
    }
}

impl<A: Annotator> FeatureBuilder<A> {
    pub fn with_annotator(annotator: A, vocab_size: usize, window_size: usize) -> Self {
        Self {
            annotator,
            vocab_size,
            window_size,
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Use a different reserved separator.
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Names of the categorical columns, in schema order.
    #[must_use]
    pub fn categorical_columns(&self) -> Vec<String> {
        let mut names = vec!["word".to_string(), "pos".to_string()];
        names.extend(window::column_names("word", self.window_size));
        names.extend(window::column_names("pos", self.window_size));
        names
    }

    pub fn build(
        &self,
        chunked: &[ChunkedFragment],
        unchunked: &[UnchunkedFragment],
    ) -> Result<FeatureTables, FeatureError> {
        self.check_separator(chunked.iter().map(|f| (f.source.as_str(), f.text.as_str())))?;
        self.check_separator(unchunked.iter().map(|f| (f.source.as_str(), f.text.as_str())))?;

        let chunked_texts: Vec<&str> = chunked.iter().map(|f| f.text.as_str()).collect();
        let unchunked_texts: Vec<&str> = unchunked.iter().map(|f| f.text.as_str()).collect();
        let chunked_tokens = self.tokenize_units(&chunked_texts)?;
        let unchunked_tokens = self.tokenize_units(&unchunked_texts)?;
        debug!(
            "Tokenized {} chunked fragments into {} tokens, {} unchunked fragments into {} tokens",
            chunked.len(),
            chunked_tokens.len(),
            unchunked.len(),
            unchunked_tokens.len()
        );

        let token_units: Vec<usize> = chunked_tokens.iter().map(|t| t.unit).collect();
        let tags = encode_fragments(chunked, &token_units);

        // Chunked tokens first, then unchunked; both keep input order.
        let all_tokens: Vec<(Partition, &str, &UnitToken)> = chunked_tokens
            .iter()
            .map(|t| (Partition::Chunked, chunked[t.unit].source.as_str(), t))
            .chain(
                unchunked_tokens
                    .iter()
                    .map(|t| (Partition::Unchunked, unchunked[t.unit].source.as_str(), t)),
            )
            .collect();

        let surfaces: Vec<&str> = all_tokens.iter().map(|(_, _, t)| t.surface.as_str()).collect();
        let words = reduce_vocabulary(&surfaces, self.vocab_size);
        let pos: Vec<String> = all_tokens.iter().map(|(_, _, t)| t.pos.clone()).collect();
        let groups: Vec<(Partition, &str)> = all_tokens.iter().map(|&(p, s, _)| (p, s)).collect();

        let word_context = window::grouped_lag_lead(&words, &groups, self.window_size);
        let pos_context = window::grouped_lag_lead(&pos, &groups, self.window_size);
        let mut columns: Vec<Vec<String>> = vec![words, pos];
        columns.extend(word_context);
        columns.extend(pos_context);

        let schema = Arc::new(OneHotSchema::fit(&self.categorical_columns(), &columns));

        let mut chunked_table = ChunkedTable::new(Arc::clone(&schema));
        let mut unchunked_table = UnchunkedTable::new(Arc::clone(&schema));
        let mut tags = tags.into_iter();

        for (row, (partition, source, token)) in all_tokens.iter().enumerate() {
            let values: Vec<&str> = columns.iter().map(|c| c[row].as_str()).collect();
            let indicators = schema.encode(&values);
            match partition {
                Partition::Chunked => {
                    if let Some(tag) = tags.next() {
                        chunked_table.push(FeatureRow {
                            indicators,
                            label: tag,
                        });
                    }
                }
                Partition::Unchunked => unchunked_table.push(FeatureRow {
                    indicators,
                    label: TokenTrace {
                        source: source.to_string(),
                        word: token.surface.clone(),
                    },
                }),
            }
        }

        info!(
            "Built feature tables: {} chunked rows, {} unchunked rows, {} indicator columns",
            chunked_table.len(),
            unchunked_table.len(),
            schema.width()
        );

        Ok(FeatureTables {
            chunked: chunked_table,
            unchunked: unchunked_table,
        })
    }

    fn check_separator<'a, I>(&self, texts: I) -> Result<(), FeatureError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (source, text) in texts {
            if text.contains(self.separator) {
                return Err(FeatureError::ReservedSeparator {
                    document: source.to_string(),
                    separator: self.separator,
                });
            }
        }
        Ok(())
    }

    /// Tokenize all units as one string and assign each word to its unit.
    fn tokenize_units(&self, texts: &[&str]) -> Result<Vec<UnitToken>, FeatureError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let separator = self.separator.to_string();
        let joined = texts.join(&format!(" {separator} "));
        let annotated = self.annotator.annotate_units(&joined, self.separator)?;

        let mut unit = 0;
        let mut tokens = Vec::new();
        for token in annotated.iter().filter(|t| t.kind == TokenKind::Word) {
            let surface = token.surface(&joined);
            if surface == separator {
                unit += 1;
                continue;
            }
            if surface.contains(self.separator) || unit >= texts.len() {
                return Err(FeatureError::Misaligned {
                    expected: texts.len(),
                    found: unit + 1,
                });
            }
            tokens.push(UnitToken {
                unit,
                surface: surface.to_string(),
                pos: token.pos.clone(),
            });
        }

        if unit + 1 != texts.len() {
            return Err(FeatureError::Misaligned {
                expected: texts.len(),
                found: unit + 1,
            });
        }
        Ok(tokens)
    }
}
