//! Feature tables.
//!
//! Rows are stored sparsely as active indicator indices over a shared
//! [`OneHotSchema`]; [`FeatureTable::write_csv`] expands them to the dense 0/1
//! layout for export.
use std::io::Write;
use std::sync::Arc;

use super::schema::OneHotSchema;
use crate::tagging::CompositeTag;

/// Traceability columns carried by inference rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTrace {
    pub source: String,
    pub word: String,
}

/// One token row: active indicators plus the partition-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow<L> {
    pub indicators: Vec<usize>,
    pub label: L,
}

#[derive(Debug, Clone)]
pub struct FeatureTable<L> {
    schema: Arc<OneHotSchema>,
    rows: Vec<FeatureRow<L>>,
}

/// Training table: rows carry their composite tag.
pub type ChunkedTable = FeatureTable<CompositeTag>;
/// Inference table: rows carry source id and original word.
pub type UnchunkedTable = FeatureTable<TokenTrace>;

impl<L> FeatureTable<L> {
    pub fn new(schema: Arc<OneHotSchema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(schema: Arc<OneHotSchema>, rows: Vec<FeatureRow<L>>) -> Self {
        Self { schema, rows }
    }

    pub fn push(&mut self, row: FeatureRow<L>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<OneHotSchema> {
        &self.schema
    }

    #[must_use]
    pub fn rows(&self) -> &[FeatureRow<L>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.rows.iter().map(|r| &r.label)
    }

    /// Indicator columns followed by the payload columns.
    #[must_use]
    pub fn column_names(&self) -> Vec<String>
    where
        L: CsvPayload,
    {
        let mut names = self.schema.indicator_names();
        names.extend(L::headers().iter().map(|h| h.to_string()));
        names
    }

    /// Write the dense table as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()>
    where
        L: CsvPayload,
    {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.column_names())?;
        for row in &self.rows {
            let mut record: Vec<String> = self
                .schema
                .densify(&row.indicators)
                .iter()
                .map(u8::to_string)
                .collect();
            record.extend(row.label.fields());
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl<L: Clone> FeatureTable<L> {
    /// New table with the rows at `indices`, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Self::with_rows(Arc::clone(&self.schema), rows)
    }
}

/// Per-row columns appended after the indicators on export.
pub trait CsvPayload {
    fn headers() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

impl CsvPayload for CompositeTag {
    fn headers() -> &'static [&'static str] {
        &["tag"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl CsvPayload for TokenTrace {
    fn headers() -> &'static [&'static str] {
        &["word", "source"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.word.clone(), self.source.clone()]
    }
}
