//! CSV reading and writing.
//!
//! Chunked input: `source,text,component,statement_ID`.
//! Unchunked input: `source,text`.
//! Spans are written as `source,statement_ID,component,text`.
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::features::FeatureTable;
use crate::features::table::CsvPayload;
use crate::fragment::{ChunkedFragment, UnchunkedFragment};
use crate::harness::ContingencyTable;
use crate::tagging::ComponentSpan;

/// Read records of any deserializable row type from CSV.
pub fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut records = Vec::new();
    for (line, record) in csv_reader.deserialize().enumerate() {
        // +2: header line and 1-based numbering
        let record: T = record.with_context(|| format!("invalid record on line {}", line + 2))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_chunked(path: &Path) -> Result<Vec<ChunkedFragment>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let fragments: Vec<ChunkedFragment> =
        read_records(file).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!("Read {} chunked fragments from {}", fragments.len(), path.display());
    Ok(fragments)
}

pub fn read_unchunked(path: &Path) -> Result<Vec<UnchunkedFragment>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let fragments: Vec<UnchunkedFragment> =
        read_records(file).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!("Read {} unchunked fragments from {}", fragments.len(), path.display());
    Ok(fragments)
}

/// Write reconstructed spans as CSV.
pub fn write_spans<W: Write>(writer: W, spans: &[ComponentSpan]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    if spans.is_empty() {
        out.write_record(["source", "statement_ID", "component", "text"])?;
    }
    for span in spans {
        out.serialize(span).context("failed to serialize span")?;
    }
    out.flush()?;
    Ok(())
}

pub fn save_spans(path: &Path, spans: &[ComponentSpan]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_spans(file, spans)
}

pub fn save_table<L: CsvPayload>(path: &Path, table: &FeatureTable<L>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    table
        .write_csv(file)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn save_contingency(path: &Path, table: &ContingencyTable) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    table
        .write_csv(file)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_chunked_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunked.csv");
        fs::write(
            &path,
            "source,text,component,statement_ID\n\
             rules,Members,attribute,1\n\
             rules,shall,deontic,1\n\
             rules,Preamble text,,2\n",
        )
        .unwrap();

        let fragments = read_chunked(&path).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[1].component.as_deref(), Some("deontic"));
        assert!(fragments[2].component.is_none());
    }

    #[test]
    fn test_read_unchunked_ignores_extra_columns() {
        let data = "source,text,extra\nnew,Officers must file,x\n";
        let fragments: Vec<UnchunkedFragment> = read_records(data.as_bytes()).unwrap();
        assert_eq!(fragments, vec![UnchunkedFragment::new("new", "Officers must file")]);
    }

    #[test]
    fn test_read_reports_line() {
        let data = "source,text,component\nnew,x,aim\n";
        let err = read_records::<ChunkedFragment, _>(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_chunked(Path::new("/nonexistent/chunked.csv")).is_err());
    }

    #[test]
    fn test_write_spans() {
        let spans = vec![
            ComponentSpan {
                source: "rules".into(),
                statement_id: 1,
                component: Some("aim".into()),
                text: "pay dues".into(),
            },
            ComponentSpan {
                source: "rules".into(),
                statement_id: 2,
                component: None,
                text: "Note".into(),
            },
        ];
        let mut buf = Vec::new();
        write_spans(&mut buf, &spans).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "source,statement_ID,component,text\nrules,1,aim,pay dues\nrules,2,NA,Note\n"
        );
    }

    #[test]
    fn test_write_no_spans_has_header() {
        let mut buf = Vec::new();
        write_spans(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "source,statement_ID,component,text\n"
        );
    }
}
