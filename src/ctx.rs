use std::path::PathBuf;

use crate::geneset::Reconciled;
use crate::io::gene_scores::GeneScoreMap;
use crate::ora::{MasterRecord, OraTable};
use crate::schema::v1::RunKey;
use crate::scorer::ParsedScorerOutput;
use crate::stats::{ClassifiedModule, CorrectionMethod, SigGeneTiers, TierThresholds};
use crate::summary::ModuleSummary;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub scores: PathBuf,
    pub modules: PathBuf,
    pub gene_col: String,
    pub pval_col: String,
    pub sep: u8,
    pub study: String,
    pub trait_name: String,
}

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub scorer_output: PathBuf,
    pub gene_scores: PathBuf,
    pub sig_modules_out: PathBuf,
    pub alpha: f64,
    pub gene_alpha: f64,
    pub num_tests: Option<usize>,
    pub correction: CorrectionMethod,
}

#[derive(Debug, Clone)]
pub struct OraConfig {
    pub ora_dir: PathBuf,
    pub sep: u8,
    /// Summary table to merge when no summary was built in this run.
    pub summary: Option<PathBuf>,
    /// Defaults to `<out_dir>/<run stem>_merged.csv`.
    pub merged_out: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    pub module_file: PathBuf,
    pub score_path: PathBuf,
    pub module_path: PathBuf,
    pub background_path: PathBuf,
    pub reconciled: Reconciled,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub scorer_result_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub significant_module_paths: Vec<PathBuf>,
    pub no_significant_marker: Option<PathBuf>,
    pub merged_path: Option<PathBuf>,
    pub aggregated_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Ctx {
    pub tool_version: String,
    pub run_key: Option<RunKey>,
    pub reconcile: Option<ReconcileConfig>,
    pub process: Option<ProcessConfig>,
    pub ora: Option<OraConfig>,
    pub aggregate_inputs: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub reconciled: Vec<ReconcileOutput>,
    pub parsed: Option<ParsedScorerOutput>,
    pub gene_scores: Option<GeneScoreMap>,
    pub num_tests: Option<usize>,
    pub thresholds: Option<TierThresholds>,
    pub gene_tiers: Option<SigGeneTiers>,
    pub classified: Vec<ClassifiedModule>,
    pub summary: Option<ModuleSummary>,
    pub ora_table: Option<OraTable>,
    pub master: Vec<MasterRecord>,
    pub output: OutputPaths,
}

impl Ctx {
    pub fn new(out_dir: PathBuf, tool_version: &str) -> Self {
        Self {
            tool_version: tool_version.to_string(),
            run_key: None,
            reconcile: None,
            process: None,
            ora: None,
            aggregate_inputs: Vec::new(),
            warnings: Vec::new(),
            reconciled: Vec::new(),
            parsed: None,
            gene_scores: None,
            num_tests: None,
            thresholds: None,
            gene_tiers: None,
            classified: Vec::new(),
            summary: None,
            ora_table: None,
            master: Vec::new(),
            output: OutputPaths {
                out_dir,
                summary_path: None,
                scorer_result_path: None,
                report_path: None,
                significant_module_paths: Vec::new(),
                no_significant_marker: None,
                merged_path: None,
                aggregated_path: None,
            },
        }
    }

    pub fn run_key(&self) -> anyhow::Result<&RunKey> {
        self.run_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("run key (study/trait/network) not resolved"))
    }
}
