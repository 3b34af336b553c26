use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use crate::io::table::require_column;
use crate::io::{create_buffered, format_pvalue, open_maybe_gz};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneScoreRecord {
    pub gene: String,
    pub pvalue: f64,
}

/// Gene scores in input order, as read from a headed delimited table.
#[derive(Debug, Clone, Default)]
pub struct GeneScoreTable {
    pub records: Vec<GeneScoreRecord>,
}

impl GeneScoreTable {
    pub fn read(path: &Path, gene_col: &str, pval_col: &str, sep: u8) -> Result<Self> {
        let reader = open_maybe_gz(path)?;
        Self::from_reader(reader, gene_col, pval_col, sep, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(
        reader: R,
        gene_col: &str,
        pval_col: &str,
        sep: u8,
        source: &str,
    ) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(sep)
            .has_headers(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .with_context(|| format!("{}: failed to read header", source))?
            .clone();
        let gene_idx = require_column(&headers, gene_col, source)?;
        let pval_idx = require_column(&headers, pval_col, source)?;

        let mut records = Vec::new();
        for (idx, row) in rdr.records().enumerate() {
            let line_no = idx + 2;
            let row = row.with_context(|| format!("{}:{} malformed row", source, line_no))?;
            let gene = row.get(gene_idx).unwrap_or("");
            if gene.is_empty() {
                bail!("{}:{} empty gene identifier", source, line_no);
            }
            let raw = row.get(pval_idx).unwrap_or("");
            let pvalue = parse_pvalue(raw)
                .with_context(|| format!("{}:{} invalid p-value '{}'", source, line_no, raw))?;
            records.push(GeneScoreRecord {
                gene: gene.to_string(),
                pvalue,
            });
        }

        debug!(source, genes = records.len(), "gene_scores_loaded");
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Headerless `gene<TAB>pvalue` file consumed by the external scorer.
    pub fn write_scorer_input(&self, path: &Path) -> Result<()> {
        let mut w = create_buffered(path)?;
        for r in &self.records {
            writeln!(w, "{}\t{}", r.gene, format_pvalue(r.pvalue))?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Missing-value spellings map to NaN; anything else must be a float.
pub fn parse_pvalue(raw: &str) -> Result<f64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    let v: f64 = s.parse()?;
    Ok(v)
}

/// Read-only gene -> p-value lookup used for tiering.
#[derive(Debug, Clone, Default)]
pub struct GeneScoreMap {
    scores: HashMap<String, f64>,
    rows: usize,
}

impl GeneScoreMap {
    /// Reads the headerless two-column file written by the reconciler.
    pub fn read_scorer_input(path: &Path) -> Result<Self> {
        let reader = open_maybe_gz(path)?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut pairs = Vec::new();
        for (idx, row) in rdr.records().enumerate() {
            let line_no = idx + 1;
            let row = row.with_context(|| format!("{}:{} malformed row", path.display(), line_no))?;
            if row.len() < 2 {
                bail!(
                    "{}:{} expected gene and p-value columns",
                    path.display(),
                    line_no
                );
            }
            let pvalue = parse_pvalue(&row[1]).with_context(|| {
                format!("{}:{} invalid p-value '{}'", path.display(), line_no, &row[1])
            })?;
            pairs.push((row[0].to_string(), pvalue));
        }
        Ok(Self::from_pairs(pairs))
    }

    /// First occurrence wins for duplicated genes; `rows` still counts
    /// every pair.
    pub fn from_pairs<I: IntoIterator<Item = (String, f64)>>(pairs: I) -> Self {
        let mut scores = HashMap::new();
        let mut rows = 0usize;
        for (gene, pvalue) in pairs {
            rows += 1;
            scores.entry(gene).or_insert(pvalue);
        }
        Self { scores, rows }
    }

    pub fn get(&self, gene: &str) -> Option<f64> {
        self.scores.get(gene).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(g, p)| (g.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_are_nan() {
        assert!(parse_pvalue("").unwrap().is_nan());
        assert!(parse_pvalue("NA").unwrap().is_nan());
        assert!(parse_pvalue("nan").unwrap().is_nan());
        assert_eq!(parse_pvalue(" 1e-3 ").unwrap(), 1e-3);
        assert!(parse_pvalue("abc").is_err());
    }

    #[test]
    fn first_duplicate_wins() {
        let map = GeneScoreMap::from_pairs(vec![
            ("A".to_string(), 0.1),
            ("A".to_string(), 0.9),
            ("B".to_string(), 0.2),
        ]);
        assert_eq!(map.get("A"), Some(0.1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.rows(), 3);
    }
}
