//! One row per tested module, plus the gene lists of significant modules.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use csv::StringRecord;

use crate::io::table::require_column;
use crate::io::{format_gene_list, format_pvalue};
use crate::schema::v1::RunKey;
use crate::scorer::lexer::{TokenKind, tokenize};
use crate::stats::{ClassifiedModule, SigGeneTiers, TIER_COUNT};

pub const SUMMARY_COLUMNS: [&str; 18] = [
    "study",
    "trait",
    "network",
    "moduleIndex",
    "isModuleSig",
    "modulePval",
    "moduleBonPval",
    "size",
    "numSigGenes",
    "sigGenes",
    "numSig1Genes",
    "sig1Genes",
    "numSig2Genes",
    "sig2Genes",
    "numSig3Genes",
    "sig3Genes",
    "numSig4Genes",
    "sig4Genes",
];

const TIER_LIST_COLUMNS: [&str; TIER_COUNT] =
    ["sigGenes", "sig1Genes", "sig2Genes", "sig3Genes", "sig4Genes"];

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSummaryRecord {
    pub run: RunKey,
    pub module_index: i64,
    pub is_significant: bool,
    pub pvalue: f64,
    pub corrected_pvalue: f64,
    pub size: usize,
    pub tier_genes: [Vec<String>; TIER_COUNT],
}

impl ModuleSummaryRecord {
    pub fn tier_count(&self, tier: usize) -> usize {
        self.tier_genes.get(tier).map_or(0, Vec::len)
    }

    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.run.study.clone(),
            self.run.trait_name.clone(),
            self.run.network.clone(),
            self.module_index.to_string(),
            self.is_significant.to_string(),
            format_pvalue(self.pvalue),
            format_pvalue(self.corrected_pvalue),
            self.size.to_string(),
        ];
        for genes in &self.tier_genes {
            row.push(genes.len().to_string());
            row.push(format_gene_list(genes));
        }
        row
    }

    /// Reads a row written by [`ModuleSummaryRecord::to_row`]; the count
    /// columns are recomputed from the lists.
    pub fn from_row(row: &StringRecord, cols: &SummaryColumns, source: &str) -> Result<Self> {
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
        let module_index = cell(cols.module_index).parse::<i64>().with_context(|| {
            format!(
                "{}: invalid moduleIndex '{}'",
                source,
                cell(cols.module_index)
            )
        })?;
        let is_significant = parse_flag(cell(cols.is_sig)).with_context(|| {
            format!("{}: module {} has invalid isModuleSig", source, module_index)
        })?;
        let pvalue = cell(cols.pval).parse::<f64>().with_context(|| {
            format!("{}: module {} has invalid modulePval", source, module_index)
        })?;
        let corrected_pvalue = cell(cols.corrected).parse::<f64>().with_context(|| {
            format!("{}: module {} has invalid moduleBonPval", source, module_index)
        })?;
        let size = cell(cols.size)
            .parse::<usize>()
            .with_context(|| format!("{}: module {} has invalid size", source, module_index))?;

        let mut tier_genes: [Vec<String>; TIER_COUNT] = Default::default();
        for (tier, idx) in cols.tiers.iter().enumerate() {
            tier_genes[tier] = parse_gene_list(cell(*idx)).with_context(|| {
                format!(
                    "{}: module {} has invalid {}",
                    source, module_index, TIER_LIST_COLUMNS[tier]
                )
            })?;
        }

        Ok(Self {
            run: RunKey::new(cell(cols.study), cell(cols.trait_name), cell(cols.network)),
            module_index,
            is_significant,
            pvalue,
            corrected_pvalue,
            size,
            tier_genes,
        })
    }
}

/// Column positions of a summary table header.
#[derive(Debug, Clone)]
pub struct SummaryColumns {
    study: usize,
    trait_name: usize,
    network: usize,
    module_index: usize,
    is_sig: usize,
    pval: usize,
    corrected: usize,
    size: usize,
    tiers: [usize; TIER_COUNT],
}

impl SummaryColumns {
    pub fn locate(headers: &StringRecord, source: &str) -> Result<Self> {
        let mut tiers = [0usize; TIER_COUNT];
        for (tier, name) in TIER_LIST_COLUMNS.iter().enumerate() {
            tiers[tier] = require_column(headers, name, source)?;
        }
        Ok(Self {
            study: require_column(headers, "study", source)?,
            trait_name: require_column(headers, "trait", source)?,
            network: require_column(headers, "network", source)?,
            module_index: require_column(headers, "moduleIndex", source)?,
            is_sig: require_column(headers, "isModuleSig", source)?,
            pval: require_column(headers, "modulePval", source)?,
            corrected: require_column(headers, "moduleBonPval", source)?,
            size: require_column(headers, "size", source)?,
            tiers,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleSummary {
    pub records: Vec<ModuleSummaryRecord>,
    /// Member genes of every significant module, by module index.
    pub significant: BTreeMap<i64, Vec<String>>,
}

impl ModuleSummary {
    pub fn has_significant(&self) -> bool {
        !self.significant.is_empty()
    }
}

pub fn build(run: &RunKey, classified: &[ClassifiedModule], tiers: &SigGeneTiers) -> ModuleSummary {
    let mut summary = ModuleSummary::default();
    for module in classified {
        if module.is_significant {
            summary
                .significant
                .insert(module.module_index, module.genes.clone());
        }
        summary.records.push(ModuleSummaryRecord {
            run: run.clone(),
            module_index: module.module_index,
            is_significant: module.is_significant,
            pvalue: module.uncorrected_pvalue,
            corrected_pvalue: module.corrected_pvalue,
            size: module.genes.len(),
            tier_genes: tiers.split(&module.genes),
        });
    }
    summary
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => bail!("expected a boolean, found '{}'", other),
    }
}

/// Inverse of [`format_gene_list`]: `['A', 'B']` or `[]`.
pub fn parse_gene_list(raw: &str) -> Result<Vec<String>> {
    let tokens = tokenize(raw)?;
    let mut iter = tokens.into_iter().map(|t| t.kind);
    if iter.next() != Some(TokenKind::LBracket) {
        bail!("gene list must start with '['");
    }
    let mut genes = Vec::new();
    loop {
        match iter.next() {
            Some(TokenKind::RBracket) if genes.is_empty() => break,
            Some(TokenKind::Str(g)) => genes.push(g),
            other => bail!("expected quoted gene name, found {:?}", other),
        }
        match iter.next() {
            Some(TokenKind::Comma) => continue,
            Some(TokenKind::RBracket) => break,
            other => bail!("expected ',' or ']', found {:?}", other),
        }
    }
    if let Some(extra) = iter.next() {
        bail!("trailing content after gene list: {:?}", extra);
    }
    Ok(genes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_list_literal_round_trip() {
        let genes = vec!["TP53".to_string(), "BRCA1".to_string()];
        assert_eq!(parse_gene_list(&format_gene_list(&genes)).unwrap(), genes);
        assert!(parse_gene_list("[]").unwrap().is_empty());
        assert!(parse_gene_list("['A',").is_err());
        assert!(parse_gene_list("A, B").is_err());
    }

    #[test]
    fn gene_list_keeps_quotes_and_backslashes() {
        let genes = vec![
            "5'UTR-X".to_string(),
            r"A\B".to_string(),
            "\"quoted\"".to_string(),
        ];
        assert_eq!(parse_gene_list(&format_gene_list(&genes)).unwrap(), genes);
    }
}
