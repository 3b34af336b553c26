//! Over-representation results per module, folded into wide columns and
//! joined onto the module summary.

use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::io::format_pvalue;
use crate::schema::v1::{NO_DATA_FOUND, NOT_APPLICABLE, RunKey};
use crate::summary::{ModuleSummaryRecord, SUMMARY_COLUMNS};

mod loader;
mod merge;

pub use loader::{load_ora_dir, read_ora_terms};
pub use merge::{merge, merge_from_dir};

/// Gene Ontology branch an ORA table was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationSource {
    BiologicalProcess,
    MolecularFunction,
}

impl AnnotationSource {
    pub const ALL: [AnnotationSource; 2] = [
        AnnotationSource::BiologicalProcess,
        AnnotationSource::MolecularFunction,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            AnnotationSource::BiologicalProcess => "geneontology_Biological_Process",
            AnnotationSource::MolecularFunction => "geneontology_Molecular_Function",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            AnnotationSource::BiologicalProcess => "BP",
            AnnotationSource::MolecularFunction => "MF",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.dir_name() == name)
    }

    fn slot(&self) -> usize {
        match self {
            AnnotationSource::BiologicalProcess => 0,
            AnnotationSource::MolecularFunction => 1,
        }
    }

    pub fn columns(&self) -> [String; 4] {
        let p = self.prefix();
        [
            self.dir_name().to_string(),
            format!("{}minCorrectedPval", p),
            format!("{}minFDREnrichmentRatio", p),
            format!("{}maxEnrichmentRatio", p),
        ]
    }
}

/// Composite join key. Every part is a string; module indices are
/// canonicalised so that `05` and `5` meet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OraKey {
    pub study: String,
    pub trait_name: String,
    pub network: String,
    pub module_index: String,
}

impl OraKey {
    pub fn new(run: &RunKey, module_index: &str) -> Self {
        Self {
            study: run.study.trim().to_string(),
            trait_name: run.trait_name.trim().to_string(),
            network: run.network.trim().to_string(),
            module_index: normalize_index(module_index),
        }
    }

    /// `[sig_]<study>_<trait>_<network>_<moduleIndex>`.
    pub fn from_file_stem(stem: &str) -> Result<Self> {
        let stem = stem.strip_prefix("sig_").unwrap_or(stem);
        let Some((run_part, index)) = stem.rsplit_once('_') else {
            bail!("ORA file name '{}' does not end in _<moduleIndex>", stem);
        };
        if index.is_empty() {
            bail!("ORA file name '{}' has an empty module index", stem);
        }
        let run = RunKey::from_stem(run_part)?;
        Ok(Self::new(&run, index))
    }

    pub fn run(&self) -> RunKey {
        RunKey::new(&self.study, &self.trait_name, &self.network)
    }
}

pub fn normalize_index(raw: &str) -> String {
    let s = raw.trim();
    match s.parse::<i64>() {
        Ok(v) => v.to_string(),
        Err(_) => s.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OraTerm {
    pub fdr: f64,
    pub enrichment_ratio: f64,
}

/// Statistics of one module against one annotation source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OraStats {
    /// ORA was not run for this module, or the key is absent.
    NotApplicable,
    /// ORA ran and returned no terms.
    NoDataFound,
    Found {
        term_count: usize,
        min_fdr: f64,
        min_fdr_enrichment: f64,
        max_enrichment: f64,
    },
}

impl OraStats {
    pub fn from_terms(terms: &[OraTerm]) -> Self {
        if terms.is_empty() {
            return OraStats::NoDataFound;
        }
        let min_fdr = terms.iter().map(|t| t.fdr).fold(f64::INFINITY, f64::min);
        let min_fdr_enrichment = terms
            .iter()
            .filter(|t| t.fdr == min_fdr)
            .map(|t| t.enrichment_ratio)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_enrichment = terms
            .iter()
            .map(|t| t.enrichment_ratio)
            .fold(f64::NEG_INFINITY, f64::max);
        OraStats::Found {
            term_count: terms.len(),
            min_fdr,
            min_fdr_enrichment,
            max_enrichment,
        }
    }

    pub fn cells(&self) -> [String; 4] {
        match self {
            OraStats::NotApplicable => std::array::from_fn(|_| NOT_APPLICABLE.to_string()),
            OraStats::NoDataFound => std::array::from_fn(|_| NO_DATA_FOUND.to_string()),
            OraStats::Found {
                term_count,
                min_fdr,
                min_fdr_enrichment,
                max_enrichment,
            } => [
                term_count.to_string(),
                format_pvalue(*min_fdr),
                format_pvalue(*min_fdr_enrichment),
                format_pvalue(*max_enrichment),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OraSummaryRecord {
    pub key: OraKey,
    pub source: AnnotationSource,
    pub stats: OraStats,
}

/// Wide ORA statistics per module, one slot per annotation source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OraRow {
    by_source: [OraStats; 2],
}

impl OraRow {
    pub fn not_applicable() -> Self {
        Self {
            by_source: [OraStats::NotApplicable; 2],
        }
    }

    pub fn get(&self, source: AnnotationSource) -> OraStats {
        self.by_source[source.slot()]
    }

    pub fn cells(&self) -> Vec<String> {
        AnnotationSource::ALL
            .iter()
            .flat_map(|s| self.get(*s).cells())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OraTable {
    rows: BTreeMap<OraKey, OraRow>,
    placeholder: bool,
}

impl OraTable {
    /// Folds per-source records into one row per module. With no records
    /// at all the table holds a single module-`0` placeholder row.
    pub fn from_records(records: Vec<OraSummaryRecord>, run: Option<&RunKey>) -> Result<Self> {
        if records.is_empty() {
            let run = run
                .cloned()
                .unwrap_or_else(|| RunKey::new(NOT_APPLICABLE, NOT_APPLICABLE, NOT_APPLICABLE));
            let mut rows = BTreeMap::new();
            rows.insert(OraKey::new(&run, "0"), OraRow::not_applicable());
            return Ok(Self {
                rows,
                placeholder: true,
            });
        }

        let mut rows: BTreeMap<OraKey, OraRow> = BTreeMap::new();
        for record in records {
            let row = rows
                .entry(record.key.clone())
                .or_insert_with(OraRow::not_applicable);
            let slot = &mut row.by_source[record.source.slot()];
            if *slot != OraStats::NotApplicable {
                bail!(
                    "duplicate {} ORA result for module {} of {}",
                    record.source.prefix(),
                    record.key.module_index,
                    record.key.run()
                );
            }
            *slot = record.stats;
        }
        Ok(Self {
            rows,
            placeholder: false,
        })
    }

    pub fn get(&self, key: &OraKey) -> Option<&OraRow> {
        self.rows.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OraKey, &OraRow)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// A module summary row with its ORA columns attached.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRecord {
    pub summary: ModuleSummaryRecord,
    pub ora: OraRow,
}

impl MasterRecord {
    pub fn header() -> Vec<String> {
        let mut header: Vec<String> = SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect();
        for source in AnnotationSource::ALL {
            header.extend(source.columns());
        }
        header
    }

    pub fn to_row(&self) -> Vec<String> {
        let mut row = self.summary.to_row();
        row.extend(self.ora.cells());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_significant_module_file() {
        let key = OraKey::from_file_stem("sig_twas_3-ABI_coexpr_012").unwrap();
        assert_eq!(key.study, "twas");
        assert_eq!(key.trait_name, "3-ABI");
        assert_eq!(key.network, "coexpr");
        assert_eq!(key.module_index, "12");
        assert!(OraKey::from_file_stem("twas_ABI").is_err());
    }

    #[test]
    fn min_fdr_tie_takes_largest_ratio() {
        let stats = OraStats::from_terms(&[
            OraTerm { fdr: 0.01, enrichment_ratio: 2.0 },
            OraTerm { fdr: 0.01, enrichment_ratio: 5.0 },
            OraTerm { fdr: 0.2, enrichment_ratio: 9.0 },
        ]);
        assert_eq!(
            stats,
            OraStats::Found {
                term_count: 3,
                min_fdr: 0.01,
                min_fdr_enrichment: 5.0,
                max_enrichment: 9.0
            }
        );
    }

    #[test]
    fn sentinels_render_distinctly() {
        assert_eq!(OraStats::NoDataFound.cells(), ["-1", "-1", "-1", "-1"]);
        assert_eq!(OraStats::NotApplicable.cells(), ["NA", "NA", "NA", "NA"]);
    }
}
