//! Windowed context columns (lags and leads).
use std::collections::HashMap;
use std::hash::Hash;

/// Fill value for positions before the start of a group.
pub const START_SENTINEL: &str = "<START>";
/// Fill value for positions past the end of a group.
pub const END_SENTINEL: &str = "<END>";

/// Names of the `2 * window` context columns derived from `base`.
///
/// Lags come first (`base_lag1..`), then leads (`base_lead1..`).
#[must_use]
pub fn column_names(base: &str, window: usize) -> Vec<String> {
    let lags = (1..=window).map(|k| format!("{base}_lag{k}"));
    let leads = (1..=window).map(|k| format!("{base}_lead{k}"));
    lags.chain(leads).collect()
}

/// Lag and lead columns for one contiguous sequence.
///
/// Returns `2 * window` columns, each as long as `values`.
#[must_use]
pub fn lag_lead<S: AsRef<str>>(values: &[S], window: usize) -> Vec<Vec<String>> {
    let n = values.len();
    let lags = (1..=window).map(|k| {
        (0..n)
            .map(|pos| match pos.checked_sub(k) {
                Some(p) => values[p].as_ref().to_string(),
                None => START_SENTINEL.to_string(),
            })
            .collect::<Vec<String>>()
    });
    let leads = (1..=window).map(|k| {
        (0..n)
            .map(|pos| match values.get(pos + k) {
                Some(v) => v.as_ref().to_string(),
                None => END_SENTINEL.to_string(),
            })
            .collect::<Vec<String>>()
    });
    lags.chain(leads).collect()
}

/// Lag and lead columns computed independently per group.
///
/// `groups[i]` is the group key of row `i`. Rows of one group need not be
/// adjacent; their relative order is what the window follows. Windows never
/// cross groups.
#[must_use]
pub fn grouped_lag_lead<S, K>(values: &[S], groups: &[K], window: usize) -> Vec<Vec<String>>
where
    S: AsRef<str>,
    K: Eq + Hash,
{
    debug_assert_eq!(values.len(), groups.len());

    let mut members: HashMap<&K, Vec<usize>> = HashMap::new();
    for (row, key) in groups.iter().enumerate() {
        members.entry(key).or_default().push(row);
    }

    let mut columns = vec![vec![String::new(); values.len()]; 2 * window];
    for rows in members.values() {
        let group: Vec<&str> = rows.iter().map(|&row| values[row].as_ref()).collect();
        for (column, filled) in columns.iter_mut().zip(lag_lead(&group, window)) {
            for (&row, value) in rows.iter().zip(filled) {
                column[row] = value;
            }
        }
    }
    columns
}
