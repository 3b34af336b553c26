use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::io::table::require_column;
use crate::ora::{AnnotationSource, OraKey, OraStats, OraSummaryRecord, OraTerm};
use crate::schema::v1::RunKey;

const FDR_COLUMN: &str = "FDR";
const ENRICHMENT_COLUMN: &str = "enrichmentRatio";
const ORA_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Reads the term rows of one ORA result table.
pub fn read_ora_terms(path: &Path, sep: u8) -> Result<Vec<OraTerm>> {
    let source = path.display().to_string();
    let mut rdr = ReaderBuilder::new()
        .delimiter(sep)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open ORA table {}", source))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("{}: failed to read header", source))?
        .clone();
    // ORA that found nothing may leave a zero-byte file.
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let fdr_idx = require_column(&headers, FDR_COLUMN, &source)?;
    let er_idx = require_column(&headers, ENRICHMENT_COLUMN, &source)?;

    let mut terms = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let line_no = idx + 2;
        let row = row.with_context(|| format!("{}:{} malformed row", source, line_no))?;
        let fdr = parse_finite(row.get(fdr_idx).unwrap_or(""))
            .with_context(|| format!("{}:{} invalid {}", source, line_no, FDR_COLUMN))?;
        let enrichment_ratio = parse_finite(row.get(er_idx).unwrap_or(""))
            .with_context(|| format!("{}:{} invalid {}", source, line_no, ENRICHMENT_COLUMN))?;
        terms.push(OraTerm {
            fdr,
            enrichment_ratio,
        });
    }
    Ok(terms)
}

fn parse_finite(raw: &str) -> Result<f64> {
    let v: f64 = raw.trim().parse()?;
    if !v.is_finite() {
        bail!("expected a finite number, found '{}'", raw);
    }
    Ok(v)
}

/// Scans `<dir>/<annotation source>/` for per-module ORA tables. When
/// `run` is given only files of that run are kept. A missing directory
/// yields no records.
pub fn load_ora_dir(dir: &Path, run: Option<&RunKey>, sep: u8) -> Result<Vec<OraSummaryRecord>> {
    if !dir.is_dir() {
        warn!(ora_dir = %dir.display(), "ora_dir_missing");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for source_dir in sorted_entries(dir)? {
        if !source_dir.is_dir() {
            continue;
        }
        let name = source_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let Some(source) = AnnotationSource::from_dir_name(name) else {
            debug!(dir = %source_dir.display(), "ora_source_skipped");
            continue;
        };

        for file in sorted_entries(&source_dir)? {
            let ext = file.extension().and_then(|s| s.to_str()).unwrap_or("");
            if !file.is_file() || !ORA_EXTENSIONS.contains(&ext) {
                continue;
            }
            let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            let key = OraKey::from_file_stem(stem)
                .with_context(|| format!("unrecognised ORA file {}", file.display()))?;
            if let Some(run) = run {
                if key.run() != OraKey::new(run, "0").run() {
                    debug!(file = %file.display(), "ora_file_other_run");
                    continue;
                }
            }
            let terms = read_ora_terms(&file, sep)?;
            records.push(OraSummaryRecord {
                key,
                source,
                stats: OraStats::from_terms(&terms),
            });
        }
    }

    debug!(records = records.len(), "ora_dir_loaded");
    Ok(records)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}
