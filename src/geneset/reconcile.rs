use std::collections::HashSet;

use crate::geneset::{ModuleDefinition, module_gene_universe};
use crate::io::gene_scores::GeneScoreTable;

/// Module definitions restricted to scored genes, plus the ORA background.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub modules: Vec<ModuleDefinition>,
    pub background: Vec<String>,
    /// Gene tokens removed from modules because they carry no score.
    pub dropped: usize,
    pub module_genes: usize,
    pub intersecting: usize,
}

pub fn reconcile(scores: &GeneScoreTable, modules: &[ModuleDefinition]) -> Reconciled {
    let scored: HashSet<&str> = scores.records.iter().map(|r| r.gene.as_str()).collect();
    let universe = module_gene_universe(modules);
    let intersecting: HashSet<&str> = universe
        .iter()
        .map(String::as_str)
        .filter(|g| scored.contains(g))
        .collect();

    let mut dropped = 0usize;
    let mut trimmed = Vec::with_capacity(modules.len());
    for def in modules {
        let mut genes = Vec::with_capacity(def.genes.len());
        for gene in &def.genes {
            if intersecting.contains(gene.as_str()) {
                genes.push(gene.clone());
            } else {
                dropped += 1;
            }
        }
        // Modules that lose every gene are kept; the scorer reports them
        // with a nan p-value and they are excluded at correction time.
        trimmed.push(ModuleDefinition {
            index: def.index.clone(),
            genes,
        });
    }

    let background = scores
        .records
        .iter()
        .filter(|r| intersecting.contains(r.gene.as_str()))
        .map(|r| r.gene.clone())
        .collect();

    Reconciled {
        modules: trimmed,
        background,
        dropped,
        module_genes: universe.len(),
        intersecting: intersecting.len(),
    }
}
