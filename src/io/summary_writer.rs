use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::io::table::write_rows;
use crate::io::{create_buffered, format_gene_list, format_pvalue, write_gene_lines};
use crate::ora::MasterRecord;
use crate::schema::v1::NOT_APPLICABLE;
use crate::scorer::ModulePvalueRecord;
use crate::stats::ClassifiedModule;
use crate::summary::{ModuleSummaryRecord, SUMMARY_COLUMNS, SummaryColumns};

pub const SCORER_RESULT_FILE: &str = "scorer_result.csv";
const SCORER_RESULT_COLUMNS: [&str; 4] =
    ["moduleIndex", "moduleGenes", "modulePval", "correctedModulePval"];

pub fn summary_slice_name(replicate: &str) -> String {
    format!("master_summary_slice_{}.csv", replicate)
}

pub fn write_summary_table(path: &Path, records: &[ModuleSummaryRecord]) -> Result<()> {
    let w = create_buffered(path)?;
    write_rows(w, &SUMMARY_COLUMNS, records.iter().map(|r| r.to_row()))
        .with_context(|| format!("failed to write summary table {}", path.display()))
}

pub fn read_summary_table(path: &Path) -> Result<Vec<ModuleSummaryRecord>> {
    let source = path.display().to_string();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open summary table {}", source))?;
    let headers = rdr.headers()?.clone();
    let cols = SummaryColumns::locate(&headers, &source)?;

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row.with_context(|| format!("{}: malformed row", source))?;
        out.push(ModuleSummaryRecord::from_row(&row, &cols, &source)?);
    }
    Ok(out)
}

/// Scorer records in input order with their corrected p-values.
pub fn write_scorer_result(
    path: &Path,
    records: &[ModulePvalueRecord],
    classified: &[ClassifiedModule],
) -> Result<()> {
    let corrected: HashMap<i64, f64> = classified
        .iter()
        .map(|c| (c.module_index, c.corrected_pvalue))
        .collect();
    let rows = records.iter().map(|r| {
        vec![
            r.module_index.to_string(),
            format_gene_list(&r.genes),
            format_pvalue(r.pvalue),
            corrected
                .get(&r.module_index)
                .map_or_else(|| NOT_APPLICABLE.to_string(), |q| format_pvalue(*q)),
        ]
    });
    let w = create_buffered(path)?;
    write_rows(w, &SCORER_RESULT_COLUMNS, rows)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn significant_module_path(dir: &Path, stem: &str, module_index: i64) -> PathBuf {
    dir.join(format!("sig_{}_{}.txt", stem, module_index))
}

/// One gene per line, one file per significant module.
pub fn write_significant_modules<'a>(
    dir: &Path,
    stem: &str,
    modules: impl IntoIterator<Item = (&'a i64, &'a Vec<String>)>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (index, genes) in modules {
        let path = significant_module_path(dir, stem, *index);
        write_gene_lines(&path, genes)?;
        written.push(path);
    }
    Ok(written)
}

/// Marks a run that completed without any significant module.
pub fn write_no_significant_marker(dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = dir.join(format!("nosig_{}.txt", stem));
    std::fs::write(&path, "-1\n").with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn write_master_table(path: &Path, records: &[MasterRecord]) -> Result<()> {
    let header = MasterRecord::header();
    let header_refs: Vec<&str> = header.iter().map(String::as_str).collect();
    let w = create_buffered(path)?;
    write_rows(w, &header_refs, records.iter().map(MasterRecord::to_row))
        .with_context(|| format!("failed to write master table {}", path.display()))
}
