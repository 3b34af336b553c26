use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::{Ctx, ReconcileOutput};
use crate::geneset::{list_module_files, load_module_file, reconcile, write_module_file};
use crate::io::gene_scores::GeneScoreTable;
use crate::io::write_gene_lines;
use crate::pipeline::Stage;

pub struct Stage1Reconcile;

impl Stage1Reconcile {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Reconcile {
    fn name(&self) -> &'static str {
        "stage1_reconcile"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cfg = ctx
            .reconcile
            .clone()
            .context("reconcile configuration missing")?;
        let scores = GeneScoreTable::read(&cfg.scores, &cfg.gene_col, &cfg.pval_col, cfg.sep)?;
        if scores.is_empty() {
            ctx.warnings
                .push(format!("gene score file {} has no rows", cfg.scores.display()));
        }
        let trait_name = replicate_trait(&cfg.scores, &cfg.trait_name);

        for module_file in list_module_files(&cfg.modules)? {
            let defs = load_module_file(&module_file)?;
            let reconciled = reconcile(&scores, &defs);

            let stem = module_file
                .file_stem()
                .and_then(|s| s.to_str())
                .context("module file name is not valid UTF-8")?;
            let tag = format!("{}_{}_{}", cfg.study, trait_name, stem);
            let out_dir = &ctx.output.out_dir;
            let score_path = out_dir.join(format!("GS_{}.tsv", tag));
            let module_path = out_dir.join(format!("Module_{}.tsv", tag));
            let background_path = out_dir.join(format!("GO_{}.txt", tag));

            scores.write_scorer_input(&score_path)?;
            write_module_file(&module_path, &reconciled.modules)?;
            write_gene_lines(&background_path, &reconciled.background)?;

            info!(
                module_file = %module_file.display(),
                dropped = reconciled.dropped,
                module_genes = reconciled.module_genes,
                intersecting = reconciled.intersecting,
                "module_genes_reconciled"
            );
            let emptied = reconciled.modules.iter().filter(|m| m.is_empty()).count();
            if emptied > 0 {
                warn!(
                    module_file = %module_file.display(),
                    emptied,
                    "modules_without_scored_genes"
                );
                ctx.warnings.push(format!(
                    "{}: {} module(s) have no scored genes",
                    module_file.display(),
                    emptied
                ));
            }

            ctx.reconciled.push(ReconcileOutput {
                module_file,
                score_path,
                module_path,
                background_path,
                reconciled,
            });
        }
        Ok(())
    }
}

/// Prefixes the trait with the permutation seed when the score file is a
/// replicate (`17-scores.csv` -> `17-<trait>`).
pub fn replicate_trait(score_file: &Path, trait_name: &str) -> String {
    let name = score_file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match name.split_once('-') {
        Some((seed, _)) if !seed.is_empty() && seed.chars().all(|c| c.is_ascii_digit()) => {
            format!("{}-{}", seed, trait_name)
        }
        _ => trait_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_prefix_moves_to_trait() {
        assert_eq!(replicate_trait(Path::new("rp/17-twas.csv"), "ABI"), "17-ABI");
        assert_eq!(replicate_trait(Path::new("twas-scores.csv"), "ABI"), "ABI");
        assert_eq!(replicate_trait(Path::new("twas.csv"), "ABI"), "ABI");
    }
}
