use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

/// Cross-tabulation of true (rows) against predicted (columns) classes.
///
/// Only counts are kept; accuracy, F1 and friends are left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContingencyTable {
    true_labels: BTreeSet<String>,
    predicted_labels: BTreeSet<String>,
    counts: BTreeMap<(String, String), usize>,
    total: usize,
}

impl ContingencyTable {
    /// Tabulate `(true, predicted)` pairs.
    pub fn tabulate<I, T, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<String>,
        P: Into<String>,
    {
        let mut table = Self::default();
        for (truth, predicted) in pairs {
            table.record(truth.into(), predicted.into());
        }
        table
    }

    pub fn record(&mut self, truth: String, predicted: String) {
        self.true_labels.insert(truth.clone());
        self.predicted_labels.insert(predicted.clone());
        *self.counts.entry((truth, predicted)).or_insert(0) += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, truth: &str, predicted: &str) -> usize {
        self.counts
            .get(&(truth.to_string(), predicted.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Row labels, sorted.
    pub fn true_labels(&self) -> impl Iterator<Item = &str> {
        self.true_labels.iter().map(String::as_str)
    }

    /// Column labels, sorted.
    pub fn predicted_labels(&self) -> impl Iterator<Item = &str> {
        self.predicted_labels.iter().map(String::as_str)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Write as CSV: one row per true class, one column per predicted class.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        let mut header = vec!["true\\predicted".to_string()];
        header.extend(self.predicted_labels().map(str::to_string));
        out.write_record(&header)?;

        for truth in self.true_labels() {
            let mut record = vec![truth.to_string()];
            record.extend(self.predicted_labels().map(|p| self.count(truth, p).to_string()));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_width = self
            .true_labels()
            .map(str::len)
            .max()
            .unwrap_or(0)
            .max("true".len());

        write!(f, "{:first_width$}", "true")?;
        for p in self.predicted_labels() {
            write!(f, " | {p}")?;
        }
        writeln!(f)?;

        for truth in self.true_labels() {
            write!(f, "{truth:first_width$}")?;
            for p in self.predicted_labels() {
                write!(f, " | {:>w$}", self.count(truth, p), w = p.len())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
