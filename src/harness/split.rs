//! Stratified train/test split.
//!
//! Rows are partitioned by tag and each tag's rows are sampled independently,
//! so rare tags keep a share of the training set. For a tag with `n` rows,
//! `round(n × fraction)` rows go to training, at least one when `n > 0` and
//! `fraction > 0`. Both sides keep the original row order.
use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::index;
use tracing::debug;

use crate::features::ChunkedTable;

/// Result of [`stratified_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub training: ChunkedTable,
    pub testing: ChunkedTable,
}

/// Number of rows of a stratum that go to training.
#[must_use]
pub fn stratum_quota(n: usize, fraction: f64) -> usize {
    let fraction = fraction.clamp(0.0, 1.0);
    let quota = ((n as f64) * fraction).round() as usize;
    if quota == 0 && n > 0 && fraction > 0.0 {
        1
    } else {
        quota.min(n)
    }
}

pub fn stratified_split<R: Rng + ?Sized>(
    table: &ChunkedTable,
    fraction: f64,
    rng: &mut R,
) -> TrainTestSplit {
    let mut strata: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (row, tag) in table.labels().enumerate() {
        strata.entry(tag.to_string()).or_default().push(row);
    }

    let mut in_training = vec![false; table.len()];
    for rows in strata.values() {
        let quota = stratum_quota(rows.len(), fraction);
        for picked in index::sample(rng, rows.len(), quota) {
            in_training[rows[picked]] = true;
        }
    }

    let (training, testing): (Vec<usize>, Vec<usize>) =
        (0..table.len()).partition(|&row| in_training[row]);

    debug!(
        "Stratified split over {} tags: {} training, {} testing",
        strata.len(),
        training.len(),
        testing.len()
    );

    TrainTestSplit {
        training: table.select(&training),
        testing: table.select(&testing),
    }
}
