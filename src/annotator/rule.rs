/// Rule-based annotator.
///
/// Word boundaries come from the BERT pre-tokenizer of the `tokenizers`
/// crate (whitespace split, punctuation isolated). Parts of speech come from a
/// closed-class lexicon and suffix rules emitting Universal POS tags. Good
/// enough to give the classifier a syntactic signal; swap in a statistical
/// tagger through [`Annotator`] when one is available.
use regex::Regex;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use super::{AnnotatedToken, Annotator, AnnotatorError, TokenKind};

// ── Lexicon ──────────────────────────────────────────────────────────

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "every", "each", "any", "some", "no",
    "all", "both", "either", "neither", "such", "another",
];

const AUXILIARIES: &[&str] = &[
    "must", "shall", "should", "may", "might", "can", "could", "will", "would", "ought", "is",
    "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does", "did",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "who", "whom",
    "which", "whose", "what", "itself", "themselves", "his", "its", "their", "our", "your", "my",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto", "upon", "under",
    "over", "within", "without", "between", "among", "through", "during", "before", "after",
    "against", "about", "above", "below", "per", "via", "pursuant",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor"];

const SUBORDINATORS: &[&str] = &[
    "if", "unless", "whether", "because", "although", "though", "while", "when", "where",
    "whereas", "until", "once", "than",
];

const PARTICLES: &[&str] = &["not", "n't"];

const ADVERBS: &[&str] = &[
    "also", "only", "then", "there", "here", "very", "more", "most", "otherwise", "thereof",
    "hereby", "herein", "therein", "annually", "however",
];

/// Rule-based tokenizer + tagger.
pub struct RuleAnnotator {
    sentence_pattern: Regex,
    adverb_suffix: Regex,
    verb_suffix: Regex,
    adjective_suffix: Regex,
    noun_suffix: Regex,
}

impl Default for RuleAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleAnnotator {
    pub fn new() -> Self {
        Self {
            sentence_pattern: Regex::new(r"\S[^.!?]*[.!?]*").unwrap(),
            adverb_suffix: Regex::new(r"^[a-z]{3,}ly$").unwrap(),
            verb_suffix: Regex::new(r"^[a-z]{2,}(ing|ed|ize|ise)$").unwrap(),
            adjective_suffix: Regex::new(r"^[a-z]{2,}(able|ible|ous|al|ive|ful|less|ic|ary)$")
                .unwrap(),
            noun_suffix: Regex::new(r"^[a-z]{2,}(tion|sion|ment|ness|ity|ance|ence|ship|er|or|s)$")
                .unwrap(),
        }
    }

    /// Universal POS tag for one word.
    pub fn tag_word(&self, word: &str, sentence_initial: bool) -> &'static str {
        if word.chars().all(|c| !c.is_alphanumeric()) {
            return "PUNCT";
        }
        if word.chars().any(|c| c.is_ascii_digit())
            && word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return "NUM";
        }

        let lower = word.to_lowercase();
        let lexical = [
            (DETERMINERS, "DET"),
            (AUXILIARIES, "AUX"),
            (PRONOUNS, "PRON"),
            (ADPOSITIONS, "ADP"),
            (COORDINATORS, "CCONJ"),
            (SUBORDINATORS, "SCONJ"),
            (PARTICLES, "PART"),
            (ADVERBS, "ADV"),
        ];
        for (words, tag) in lexical {
            if words.contains(&lower.as_str()) {
                return tag;
            }
        }

        if !sentence_initial && word.chars().next().is_some_and(char::is_uppercase) {
            return "PROPN";
        }
        if self.adverb_suffix.is_match(&lower) {
            "ADV"
        } else if self.verb_suffix.is_match(&lower) {
            "VERB"
        } else if self.adjective_suffix.is_match(&lower) {
            "ADJ"
        } else if self.noun_suffix.is_match(&lower) {
            "NOUN"
        } else if sentence_initial {
            "NOUN"
        } else {
            // Resolved from the previous tag in `annotate`.
            "X"
        }
    }

    fn word_spans(&self, text: &str) -> Result<Vec<(usize, usize)>, AnnotatorError> {
        let mut pretokenized = PreTokenizedString::from(text);
        BertPreTokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| AnnotatorError::Tokenize(e.to_string()))?;
        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(_, offsets, _)| offsets)
            .collect())
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        self.annotate_with(text, None)
    }

    fn annotate_units(&self, text: &str, separator: char) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        self.annotate_with(text, Some(separator))
    }
}

impl RuleAnnotator {
    fn annotate_with(&self, text: &str, separator: Option<char>) -> Result<Vec<AnnotatedToken>, AnnotatorError> {
        let sentences: Vec<(usize, usize)> = self
            .sentence_pattern
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut tokens = Vec::new();
        let mut sentence_iter = sentences.iter().peekable();
        let mut previous_pos: Option<&'static str> = None;
        let mut sentence_initial = true;

        for (start, end) in self.word_spans(text)? {
            while let Some(&&(s_start, s_end)) = sentence_iter.peek() {
                if s_start > start {
                    break;
                }
                tokens.push(AnnotatedToken {
                    start: s_start,
                    end: s_end,
                    kind: TokenKind::Sentence,
                    pos: String::new(),
                });
                sentence_initial = true;
                sentence_iter.next();
            }

            let word = text.get(start..end).unwrap_or_default();
            if separator.is_some_and(|sep| is_separator(word, sep)) {
                // Transparent: leaves the previous tag and sentence state alone.
                tokens.push(AnnotatedToken {
                    start,
                    end,
                    kind: TokenKind::Word,
                    pos: "PUNCT".to_string(),
                });
                continue;
            }

            let mut pos = self.tag_word(word, sentence_initial);
            if pos == "X" {
                // Bare lowercase forms after a modal or negation are base verbs.
                pos = if previous_pos == Some("AUX") || previous_pos == Some("PART") {
                    "VERB"
                } else {
                    "NOUN"
                };
            }

            tokens.push(AnnotatedToken {
                start,
                end,
                kind: TokenKind::Word,
                pos: pos.to_string(),
            });
            previous_pos = Some(pos);
            sentence_initial = pos == "PUNCT" && matches!(word, "." | "!" | "?");
        }

        Ok(tokens)
    }
}

fn is_separator(word: &str, separator: char) -> bool {
    let mut chars = word.chars();
    chars.next() == Some(separator) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(annotator: &RuleAnnotator, text: &str) -> Vec<(String, String)> {
        annotator
            .annotate(text)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| (t.surface(text).to_string(), t.pos))
            .collect()
    }

    #[test]
    fn test_splits_words_and_punctuation() {
        let annotator = RuleAnnotator::new();
        let tokens = words(&annotator, "Farmers must plant crops, annually.");
        let surfaces: Vec<&str> = tokens.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(surfaces, vec!["Farmers", "must", "plant", "crops", ",", "annually", "."]);
    }

    #[test]
    fn test_tags_modal_and_following_verb() {
        let annotator = RuleAnnotator::new();
        let tokens = words(&annotator, "The farmer must plant crops");
        let tags: Vec<&str> = tokens.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(tags, vec!["DET", "NOUN", "AUX", "VERB", "NOUN"]);
    }

    #[test]
    fn test_proper_noun_not_sentence_initial() {
        let annotator = RuleAnnotator::new();
        assert_eq!(annotator.tag_word("Board", false), "PROPN");
        assert_eq!(annotator.tag_word("Board", true), "NOUN");
    }

    #[test]
    fn test_numbers_and_punctuation() {
        let annotator = RuleAnnotator::new();
        assert_eq!(annotator.tag_word("2024", false), "NUM");
        assert_eq!(annotator.tag_word("3.5", false), "NUM");
        assert_eq!(annotator.tag_word(";", false), "PUNCT");
        assert_eq!(annotator.tag_word("¶", false), "PUNCT");
    }

    #[test]
    fn test_emits_sentence_spans() {
        let annotator = RuleAnnotator::new();
        let text = "Members shall vote. The chair may abstain.";
        let tokens = annotator.annotate(text).unwrap();
        let sentences: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Sentence)
            .map(|t| t.surface(text))
            .collect();
        assert_eq!(sentences, vec!["Members shall vote.", "The chair may abstain."]);
        assert!(tokens.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_separator_is_its_own_token() {
        let annotator = RuleAnnotator::new();
        let tokens = words(&annotator, "first unit ¶ second");
        let surfaces: Vec<&str> = tokens.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(surfaces, vec!["first", "unit", "¶", "second"]);
    }

    #[test]
    fn test_separator_does_not_break_context() {
        let annotator = RuleAnnotator::new();
        let joined = annotator
            .annotate_units("Officers ¶ must ¶ plant crops", '¶')
            .unwrap();
        let tags: Vec<&str> = joined
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.pos.as_str())
            .collect();
        assert_eq!(tags, vec!["NOUN", "PUNCT", "AUX", "PUNCT", "VERB", "NOUN"]);
    }

    #[test]
    fn test_plain_annotate_treats_separator_as_punctuation() {
        let annotator = RuleAnnotator::new();
        let tokens = words(&annotator, "must ¶ plant");
        assert_eq!(tokens[2].1, "NOUN");
    }

    #[test]
    fn test_empty_text() {
        let annotator = RuleAnnotator::new();
        assert!(annotator.annotate("").unwrap().is_empty());
    }
}
