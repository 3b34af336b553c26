//! Vertical concatenation of per-replicate master tables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::io::table::Table;
use crate::schema::v1::RunKey;

pub const MERGED_SUFFIX: &str = "_merged";

/// File name of the per-replicate merged table of `run`.
pub fn merged_table_name(run: &RunKey) -> String {
    format!("{}{}.csv", run.stem(), MERGED_SUFFIX)
}

/// Concatenates tables in the given order. All inputs must carry exactly
/// the same header.
pub fn aggregate(paths: &[PathBuf]) -> Result<Table> {
    let Some((first, rest)) = paths.split_first() else {
        bail!("no tables given to aggregate");
    };
    let mut combined = Table::read(first, b',')?;
    for path in rest {
        let table = Table::read(path, b',')?;
        if table.headers != combined.headers {
            bail!(
                "schema mismatch: {} has columns [{}] but {} has [{}]",
                path.display(),
                table.headers.iter().collect::<Vec<_>>().join(", "),
                first.display(),
                combined.headers.iter().collect::<Vec<_>>().join(", ")
            );
        }
        combined.rows.extend(table.rows);
    }
    Ok(combined)
}

/// `master_summary_<trait>_<network>_RP.csv`, with the cohort taken from
/// the first input's `<study>_<seed>-<trait>_<network>[_merged]` stem.
pub fn cohort_output_name(first: &Path) -> Result<String> {
    let stem = first
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid file name {}", first.display()))?;
    let stem = stem.strip_suffix(MERGED_SUFFIX).unwrap_or(stem);
    let run = RunKey::from_stem(stem)
        .with_context(|| format!("cannot derive cohort from {}", first.display()))?;
    let trait_name = match run.trait_name.split_once('-') {
        Some((_, t)) if !t.is_empty() => t,
        _ => run.trait_name.as_str(),
    };
    Ok(format!("master_summary_{}_{}_RP.csv", trait_name, run.network))
}

pub fn aggregate_to_dir(paths: &[PathBuf], out_dir: &Path) -> Result<(PathBuf, Table)> {
    let table = aggregate(paths)?;
    let name = cohort_output_name(&paths[0])?;
    let out = out_dir.join(name);
    table.write(&out)?;
    info!(
        inputs = paths.len(),
        rows = table.rows.len(),
        out = %out.display(),
        "tables_aggregated"
    );
    Ok((out, table))
}
