use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::io::create_buffered;

/// A delimited table kept as raw string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl Table {
    pub fn read(path: &Path, sep: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(sep)
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("failed to open table {}", path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?
            .clone();
        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("{}: malformed row {}", path.display(), idx + 2))?;
            rows.push(record);
        }
        Ok(Self { headers, rows })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let w = create_buffered(path)?;
        let mut writer = WriterBuilder::new().from_writer(w);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub fn require_column(headers: &StringRecord, name: &str, source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{}: required column '{}' missing (found: {})",
                source,
                name,
                headers.iter().collect::<Vec<_>>().join(", ")
            )
        })
}

pub(crate) fn write_rows<W: Write>(
    w: W,
    header: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(w);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
