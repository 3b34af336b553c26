use std::fmt;
use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Rendering of a value that is absent because the producing step did not
/// run or the key was never present.
pub const NOT_APPLICABLE: &str = "NA";
/// Rendering of a value from a step that ran and found nothing.
pub const NO_DATA_FOUND: &str = "-1";

/// `(study, trait, network)` identity of one enrichment run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunKey {
    pub study: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub network: String,
}

impl RunKey {
    pub fn new(study: &str, trait_name: &str, network: &str) -> Self {
        Self {
            study: study.to_string(),
            trait_name: trait_name.to_string(),
            network: network.to_string(),
        }
    }

    /// Parses `<study>_<trait>_<network...>`; everything after the second
    /// underscore belongs to the network name.
    pub fn from_stem(stem: &str) -> Result<Self> {
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 3 || parts.iter().take(3).any(|p| p.is_empty()) {
            bail!(
                "cannot derive study/trait/network from '{}' (expected <study>_<trait>_<network>)",
                stem
            );
        }
        Ok(Self::new(parts[0], parts[1], &parts[2..].join("_")))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("invalid file name {}", path.display()))?;
        Self::from_stem(stem)
    }

    /// Permutation seed prefix of the trait (`3-ABI` -> `3`).
    pub fn replicate(&self) -> &str {
        match self.trait_name.split_once('-') {
            Some((rp, _)) => rp,
            None => &self.trait_name,
        }
    }

    pub fn stem(&self) -> String {
        format!("{}_{}_{}", self.study, self.trait_name, self.network)
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.study, self.trait_name, self.network)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleCounts {
    pub parsed: u64,
    pub dropped_nan: u64,
    pub tested: u64,
    pub significant: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub module_alpha: f64,
    pub correction: String,
    pub num_tests: u64,
    pub gene_base: f64,
    pub gene_tiers: Vec<f64>,
}

/// Machine-readable record of one `process` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: ToolMeta,
    pub run: RunKey,
    pub scorer_output: String,
    pub thresholds: Thresholds,
    pub modules: ModuleCounts,
    pub significant_modules: Vec<i64>,
    pub warnings: Vec<String>,
}
