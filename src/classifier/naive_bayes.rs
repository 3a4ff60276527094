//! Categorical naive Bayes over one-hot column groups.
//!
//! Each categorical column of the schema contributes
//! `ln((n(class, value) + α) / (n(class) + α · |values|))` for the value
//! active in the row; a column with no active indicator is skipped. Ties go to
//! the class that sorts first.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClassifierError, TagModel, Trainer};
use crate::features::{ChunkedTable, FeatureTable, OneHotSchema};

fn default_smoothing() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    /// Additive (Laplace) smoothing.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NaiveBayes {
    params: NaiveBayesParams,
}

impl NaiveBayes {
    #[must_use]
    pub fn new(params: NaiveBayesParams) -> Self {
        Self { params }
    }
}

/// A fitted naive Bayes model.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    classes: Vec<String>,
    log_priors: Vec<f64>,
    /// `log_likelihoods[class][indicator]`
    log_likelihoods: Vec<Vec<f64>>,
    width: usize,
}

impl NaiveBayesModel {
    /// Classes seen in training, sorted.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_row(&self, indicators: &[usize]) -> &str {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (c, prior) in self.log_priors.iter().enumerate() {
            let likelihoods = &self.log_likelihoods[c];
            let score = prior
                + indicators
                    .iter()
                    .filter_map(|&i| likelihoods.get(i))
                    .sum::<f64>();
            if score > best_score {
                best = c;
                best_score = score;
            }
        }
        &self.classes[best]
    }
}

impl Trainer for NaiveBayes {
    type Model = NaiveBayesModel;

    fn train(&self, table: &ChunkedTable) -> Result<NaiveBayesModel, ClassifierError> {
        let alpha = self.params.smoothing;
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ClassifierError::InvalidParams(format!(
                "smoothing must be positive, got {alpha}"
            )));
        }
        if table.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let schema: &OneHotSchema = table.schema();
        let width = schema.width();

        // class -> (row count, indicator counts)
        let mut counts: BTreeMap<String, (usize, Vec<usize>)> = BTreeMap::new();
        for row in table.rows() {
            let entry = counts
                .entry(row.label.to_string())
                .or_insert_with(|| (0, vec![0; width]));
            entry.0 += 1;
            for &i in &row.indicators {
                if let Some(slot) = entry.1.get_mut(i) {
                    *slot += 1;
                }
            }
        }

        let total = table.len() as f64;
        let mut classes = Vec::with_capacity(counts.len());
        let mut log_priors = Vec::with_capacity(counts.len());
        let mut log_likelihoods = Vec::with_capacity(counts.len());

        for (class, (n_class, indicator_counts)) in counts {
            let mut likelihoods = vec![0.0; width];
            for column in schema.columns() {
                let k = column.categories.len() as f64;
                let denominator = (n_class as f64 + alpha * k).ln();
                for j in 0..column.categories.len() {
                    let i = column.offset + j;
                    likelihoods[i] = (indicator_counts[i] as f64 + alpha).ln() - denominator;
                }
            }
            classes.push(class);
            log_priors.push((n_class as f64 / total).ln());
            log_likelihoods.push(likelihoods);
        }

        debug!(
            "Trained naive Bayes on {} rows: {} classes, {} indicators",
            table.len(),
            classes.len(),
            width
        );

        Ok(NaiveBayesModel {
            classes,
            log_priors,
            log_likelihoods,
            width,
        })
    }
}

impl TagModel for NaiveBayesModel {
    fn predict<L>(&self, table: &FeatureTable<L>) -> Result<Vec<String>, ClassifierError> {
        let found = table.schema().width();
        if found != self.width {
            return Err(ClassifierError::WidthMismatch {
                expected: self.width,
                found,
            });
        }
        Ok(table
            .rows()
            .iter()
            .map(|row| self.predict_row(&row.indicators).to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureRow, OneHotSchema};
    use crate::tagging::{ComponentTag, CompositeTag, Marker};
    use std::sync::Arc;

    fn tag(s: &str) -> CompositeTag {
        s.parse().unwrap()
    }

    /// Two columns: word {must, farmer, the} and pos {AUX, NOUN, DET}.
    fn table() -> ChunkedTable {
        let names = vec!["word".to_string(), "pos".to_string()];
        let values = vec![vec!["must", "farmer", "the"], vec!["AUX", "NOUN", "DET"]];
        let schema = Arc::new(OneHotSchema::fit(&names, &values));
        let mut table = ChunkedTable::new(Arc::clone(&schema));
        let rows = [
            (["the", "DET"], "B B attribute"),
            (["farmer", "NOUN"], "I I attribute"),
            (["must", "AUX"], "I B deontic"),
            (["the", "DET"], "B B attribute"),
            (["farmer", "NOUN"], "I I attribute"),
            (["must", "AUX"], "I B deontic"),
        ];
        for (values, t) in rows {
            table.push(FeatureRow {
                indicators: schema.encode(&values),
                label: tag(t),
            });
        }
        table
    }

    #[test]
    fn test_learns_separable_classes() {
        let table = table();
        let model = NaiveBayes::default().train(&table).unwrap();
        assert_eq!(model.classes().len(), 3);
        let predicted = model.predict(&table).unwrap();
        let expected: Vec<String> = table.labels().map(ToString::to_string).collect();
        assert_eq!(predicted, expected);
    }

    #[test]
    fn test_empty_training_set() {
        let table = ChunkedTable::new(Arc::new(OneHotSchema::default()));
        let err = NaiveBayes::default().train(&table).unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyTrainingSet));
    }

    #[test]
    fn test_invalid_smoothing() {
        let model = NaiveBayes::new(NaiveBayesParams { smoothing: 0.0 }).train(&table());
        assert!(matches!(model, Err(ClassifierError::InvalidParams(_))));
    }

    #[test]
    fn test_width_mismatch() {
        let model = NaiveBayes::default().train(&table()).unwrap();
        let other: FeatureTable<()> = FeatureTable::new(Arc::new(OneHotSchema::default()));
        assert!(matches!(
            model.predict(&other),
            Err(ClassifierError::WidthMismatch { expected: 6, found: 0 })
        ));
    }

    #[test]
    fn test_prior_decides_when_no_indicators() {
        let mut table = table();
        table.push(FeatureRow {
            indicators: vec![],
            label: CompositeTag::new(Marker::Inside, ComponentTag::Inside("attribute".into()))
                .unwrap(),
        });
        let model = NaiveBayes::default().train(&table).unwrap();
        let schema = Arc::clone(table.schema());
        let blank: FeatureTable<()> =
            FeatureTable::with_rows(schema, vec![FeatureRow { indicators: vec![], label: () }]);
        // "I I attribute" is now the most frequent class.
        assert_eq!(model.predict(&blank).unwrap(), vec!["I I attribute"]);
    }

    #[test]
    fn test_params_from_json_defaults() {
        let params: NaiveBayesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, NaiveBayesParams::default());
    }
}
