//! One-hot schema for categorical feature columns.
//!
//! The schema is fit once on the union of both partitions and then applied to
//! every row, so chunked and unchunked tables always share the same indicator
//! columns. A value the schema has never seen leaves its column group all zero.
use std::collections::BTreeSet;

/// Joins column and category in indicator names.
pub const INDICATOR_SEPARATOR: char = '=';

/// One categorical input column and its sorted categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
    /// Index of this column's first indicator.
    pub offset: usize,
}

impl CategoricalColumn {
    fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Ordered list of `(column, category)` indicator pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneHotSchema {
    columns: Vec<CategoricalColumn>,
    width: usize,
}

impl OneHotSchema {
    /// Fit on `names.len()` value columns.
    ///
    /// `values[j]` holds every observed value of column `names[j]`.
    pub fn fit<S: AsRef<str>>(names: &[String], values: &[Vec<S>]) -> Self {
        debug_assert_eq!(names.len(), values.len());

        let mut columns = Vec::with_capacity(names.len());
        let mut offset = 0;
        for (name, observed) in names.iter().zip(values) {
            let categories: Vec<String> = observed
                .iter()
                .map(AsRef::as_ref)
                .collect::<BTreeSet<&str>>()
                .into_iter()
                .map(str::to_string)
                .collect();
            let len = categories.len();
            columns.push(CategoricalColumn {
                name: name.clone(),
                categories,
                offset,
            });
            offset += len;
        }

        Self {
            columns,
            width: offset,
        }
    }

    /// Total number of indicator columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn columns(&self) -> &[CategoricalColumn] {
        &self.columns
    }

    /// Indicator column names, `"{column}={category}"`, in index order.
    ///
    /// Column names never contain `=`, so the first `=` always separates the
    /// column from the category and names cannot collide.
    #[must_use]
    pub fn indicator_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|col| {
                col.categories
                    .iter()
                    .map(move |cat| format!("{}{INDICATOR_SEPARATOR}{}", col.name, cat))
            })
            .collect()
    }

    /// Active indicator indices for one row of raw values.
    #[must_use]
    pub fn encode<S: AsRef<str>>(&self, row: &[S]) -> Vec<usize> {
        self.columns
            .iter()
            .zip(row)
            .filter_map(|(col, value)| col.position(value.as_ref()).map(|p| col.offset + p))
            .collect()
    }

    /// Expand sparse indicators into a dense 0/1 row.
    #[must_use]
    pub fn densify(&self, indicators: &[usize]) -> Vec<u8> {
        let mut dense = vec![0u8; self.width];
        for &i in indicators {
            if let Some(slot) = dense.get_mut(i) {
                *slot = 1;
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OneHotSchema {
        let names = vec!["word".to_string(), "pos".to_string()];
        let values = vec![vec!["must", "farmer", "must"], vec!["AUX", "NOUN", "AUX"]];
        OneHotSchema::fit(&names, &values)
    }

    #[test]
    fn test_fit_sorted_categories() {
        let s = schema();
        assert_eq!(s.width(), 4);
        assert_eq!(
            s.indicator_names(),
            vec!["word=farmer", "word=must", "pos=AUX", "pos=NOUN"]
        );
        assert_eq!(s.columns()[1].offset, 2);
    }

    #[test]
    fn test_encode_and_densify() {
        let s = schema();
        let active = s.encode(&["must", "NOUN"]);
        assert_eq!(active, vec![1, 3]);
        assert_eq!(s.densify(&active), vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_unknown_value_is_zero_filled() {
        let s = schema();
        let active = s.encode(&["tractor", "AUX"]);
        assert_eq!(active, vec![2]);
        assert_eq!(s.densify(&active), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_indicator_names_do_not_collide() {
        let names = vec!["word".to_string(), "word_lag1".to_string()];
        let values = vec![vec!["lag1_x"], vec!["x"]];
        let s = OneHotSchema::fit(&names, &values);
        let indicators = s.indicator_names();
        assert_eq!(indicators, vec!["word=lag1_x", "word_lag1=x"]);
        assert_ne!(indicators[0], indicators[1]);
    }

    #[test]
    fn test_empty_schema() {
        let names = vec!["word".to_string()];
        let values: Vec<Vec<String>> = vec![Vec::new()];
        let s = OneHotSchema::fit(&names, &values);
        assert_eq!(s.width(), 0);
        assert!(s.indicator_names().is_empty());
        assert_eq!(s.columns().len(), 1);
    }
}
