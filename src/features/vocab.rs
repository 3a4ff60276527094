//! Vocabulary reducer.
//!
//! Keeps the `k` most frequent surface strings and maps everything else to
//! [`OOV_MARKER`]. Ties on frequency are broken by first occurrence, so the
//! kept set is stable for a given token order. The marker itself is never
//! ranked, which makes reduction idempotent.
use std::collections::{HashMap, HashSet};

use tracing::debug;

/// Replacement for out-of-vocabulary tokens.
pub const OOV_MARKER: &str = "<OOV>";

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    kept: HashSet<String>,
}

impl Vocabulary {
    /// Fit on the full token stream (all partitions together).
    pub fn fit<'a, I>(tokens: I, k: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        // token -> (count, first position)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, token) in tokens.into_iter().enumerate() {
            if token == OOV_MARKER {
                continue;
            }
            counts.entry(token).or_insert((0, position)).0 += 1;
        }

        let distinct = counts.len();
        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));

        let kept: HashSet<String> = ranked
            .into_iter()
            .take(k)
            .map(|(token, _)| token.to_string())
            .collect();

        debug!("Vocabulary: kept {} of {} distinct tokens", kept.len(), distinct);
        Self { kept }
    }

    /// The token itself if kept, otherwise the OOV marker.
    #[must_use]
    pub fn reduce<'a>(&self, token: &'a str) -> &'a str {
        if token == OOV_MARKER || self.contains(token) {
            token
        } else {
            OOV_MARKER
        }
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.kept.contains(token)
    }
}

/// Fit and apply in one go.
pub fn reduce_vocabulary<S: AsRef<str>>(tokens: &[S], k: usize) -> Vec<String> {
    let vocab = Vocabulary::fit(tokens.iter().map(AsRef::as_ref), k);
    tokens
        .iter()
        .map(|t| vocab.reduce(t.as_ref()).to_string())
        .collect()
}
