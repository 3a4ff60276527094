/// Tokenizer / POS-tagger trait and shared types.
///
/// The feature builder only relies on this contract: text in, ordered spans
/// with a token kind and (for words) a part-of-speech tag out.
pub mod rule;

use thiserror::Error;

pub use rule::RuleAnnotator;

/// Errors that can occur while annotating text.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("tokenization failed: {0}")]
    Tokenize(String),
}

/// Kind of an annotated span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Sentence,
    Other,
}

/// One annotated span of the input text (byte offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    /// Universal POS tag; empty for non-word spans.
    pub pos: String,
}

impl AnnotatedToken {
    /// The covered slice of `text`.
    #[must_use]
    pub fn surface<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or_default()
    }
}

/// Trait for tokenizer + tagger implementations.
pub trait Annotator {
    /// Annotate `text`, returning spans ordered by start offset.
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>, AnnotatorError>;

    /// Annotate independent units joined by `separator`.
    ///
    /// Separator tokens are still emitted as words, but must not change the
    /// tags of the words around them: a unit boundary is not a word of the
    /// text. The default ignores the separator.
    fn annotate_units(&self, text: &str, _separator: char) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        self.annotate(text)
    }
}

impl<A: Annotator + ?Sized> Annotator for &A {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        (**self).annotate(text)
    }

    fn annotate_units(&self, text: &str, separator: char) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        (**self).annotate_units(text, separator)
    }
}
