use std::collections::HashSet;

use anyhow::{Result, bail};

use crate::io::gene_scores::GeneScoreMap;

pub const TIER_COUNT: usize = 5;
const TIER_MULTIPLIERS: [f64; TIER_COUNT] = [1.0, 10.0, 100.0, 1_000.0, 10_000.0];

/// Per-gene thresholds `T, 10T, 100T, 1000T, 10000T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    base: f64,
}

impl TierThresholds {
    pub fn new(base: f64) -> Result<Self> {
        if !base.is_finite() || base <= 0.0 {
            bail!("gene threshold must be a positive finite number, got {}", base);
        }
        Ok(Self { base })
    }

    /// `T = gene_alpha / num_tests`.
    pub fn from_num_tests(gene_alpha: f64, num_tests: usize) -> Result<Self> {
        if num_tests == 0 {
            bail!("number of tests must be at least 1");
        }
        Self::new(gene_alpha / num_tests as f64)
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn values(&self) -> [f64; TIER_COUNT] {
        TIER_MULTIPLIERS.map(|m| self.base * m)
    }
}

/// Genes below each tier threshold. Each tier is evaluated against the
/// full score mapping on its own, so the tiers nest.
#[derive(Debug, Clone)]
pub struct SigGeneTiers {
    sets: [HashSet<String>; TIER_COUNT],
}

impl SigGeneTiers {
    pub fn build(scores: &GeneScoreMap, thresholds: &TierThresholds) -> Self {
        let limits = thresholds.values();
        let mut sets: [HashSet<String>; TIER_COUNT] = std::array::from_fn(|_| HashSet::new());
        for (gene, p) in scores.iter() {
            for (tier, limit) in limits.iter().enumerate() {
                if p < *limit {
                    sets[tier].insert(gene.to_string());
                }
            }
        }
        Self { sets }
    }

    pub fn contains(&self, tier: usize, gene: &str) -> bool {
        self.sets.get(tier).is_some_and(|s| s.contains(gene))
    }

    pub fn tier_len(&self, tier: usize) -> usize {
        self.sets.get(tier).map_or(0, HashSet::len)
    }

    /// Members of `genes` in each tier, preserving module order.
    pub fn split(&self, genes: &[String]) -> [Vec<String>; TIER_COUNT] {
        std::array::from_fn(|tier| {
            genes
                .iter()
                .filter(|g| self.sets[tier].contains(g.as_str()))
                .cloned()
                .collect()
        })
    }
}
