use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::ora::{MasterRecord, OraKey, OraRow, OraTable, load_ora_dir};
use crate::schema::v1::RunKey;
use crate::summary::ModuleSummaryRecord;

/// Left-outer join of the summary onto ORA rows by
/// `(study, trait, network, moduleIndex)`. Every summary row appears exactly
/// once; unmatched ORA columns are not applicable.
pub fn merge(summary: &[ModuleSummaryRecord], ora: &OraTable) -> Vec<MasterRecord> {
    summary
        .iter()
        .map(|record| {
            let key = OraKey::new(&record.run, &record.module_index.to_string());
            let row = ora.get(&key).copied().unwrap_or_else(OraRow::not_applicable);
            MasterRecord {
                summary: record.clone(),
                ora: row,
            }
        })
        .collect()
}

pub fn merge_from_dir(
    summary: &[ModuleSummaryRecord],
    ora_dir: &Path,
    run: Option<&RunKey>,
    sep: u8,
) -> Result<(OraTable, Vec<MasterRecord>)> {
    let records = load_ora_dir(ora_dir, run, sep)?;
    let table = OraTable::from_records(records, run)?;
    let merged = merge(summary, &table);
    let matched = merged
        .iter()
        .filter(|m| m.ora != OraRow::not_applicable())
        .count();
    info!(
        modules = merged.len(),
        ora_rows = table.len(),
        matched,
        placeholder = table.is_placeholder(),
        "ora_merged"
    );
    Ok((table, merged))
}
