use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::gene_scores::GeneScoreMap;
use crate::pipeline::Stage;
use crate::stats::{SigGeneTiers, TierThresholds, classify};

pub struct Stage3Classify;

impl Stage3Classify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Classify {
    fn name(&self) -> &'static str {
        "stage3_classify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cfg = ctx
            .process
            .clone()
            .context("process configuration missing")?;
        let scores = GeneScoreMap::read_scorer_input(&cfg.gene_scores)?;
        let num_tests = cfg.num_tests.unwrap_or(scores.rows());
        let thresholds = TierThresholds::from_num_tests(cfg.gene_alpha, num_tests)
            .with_context(|| {
                format!(
                    "cannot derive gene thresholds from {}",
                    cfg.gene_scores.display()
                )
            })?;
        let tiers = SigGeneTiers::build(&scores, &thresholds);

        let parsed = ctx.parsed.as_ref().context("scorer output not parsed")?;
        let classified = classify(&parsed.records, cfg.alpha, cfg.correction);
        let significant = classified.iter().filter(|m| m.is_significant).count();

        info!(
            correction = %cfg.correction,
            alpha = cfg.alpha,
            tested = classified.len(),
            significant,
            num_tests,
            gene_threshold = thresholds.base(),
            tightest_tier_genes = tiers.tier_len(0),
            "modules_classified"
        );

        ctx.num_tests = Some(num_tests);
        ctx.thresholds = Some(thresholds);
        ctx.gene_tiers = Some(tiers);
        ctx.gene_scores = Some(scores);
        ctx.classified = classified;
        Ok(())
    }
}
