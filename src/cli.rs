use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "modenrich",
    version,
    about = "Gene-module enrichment post-processing for pathway scorer results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Intersect a gene score table with module definitions
    Reconcile(ReconcileArgs),
    /// Parse scorer output, correct module p-values and write the summary
    Process(ProcessArgs),
    /// Join per-module ORA statistics onto a module summary
    MergeOra(MergeOraArgs),
    /// Concatenate per-replicate master tables
    Aggregate(AggregateArgs),
    /// `process` followed by `merge-ora` for one replicate
    Run(RunArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    #[arg(long, help = "Gene score table (header row required, .gz accepted)")]
    pub scores: PathBuf,

    #[arg(long, help = "Module file or directory of *.txt module files")]
    pub modules: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Study or pipeline name, e.g. twas")]
    pub study: String,

    #[arg(long = "trait")]
    pub trait_name: String,

    #[arg(long, default_value = "Gene")]
    pub gene_col: String,

    #[arg(long, default_value = "Pvalue")]
    pub pval_col: String,

    #[arg(long, default_value = ",", help = "Field separator of the score table: ',' or '\\t'")]
    pub sep: String,
}

#[derive(Debug, Clone, Args)]
pub struct RunKeyArgs {
    #[arg(long, requires_all = ["trait_name", "network"])]
    pub study: Option<String>,

    #[arg(long = "trait", requires_all = ["study", "network"])]
    pub trait_name: Option<String>,

    #[arg(long, requires_all = ["study", "trait_name"])]
    pub network: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    #[arg(long, help = "Raw scorer output (<study>_<trait>_<network>.txt)")]
    pub scorer_output: PathBuf,

    #[arg(long, help = "Reconciled two-column gene score file (GS_*.tsv)")]
    pub gene_scores: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(
        long,
        help = "Directory for significant module gene lists (default: <out>/significant_modules)"
    )]
    pub sig_modules_out: Option<PathBuf>,

    #[arg(long, default_value_t = 0.05, help = "Module significance threshold after correction")]
    pub alpha: f64,

    #[arg(long, help = "Gene count before category merging (default: rows in --gene-scores)")]
    pub num_tests: Option<usize>,

    #[arg(long, default_value_t = 0.05, help = "Numerator of the per-gene base threshold")]
    pub gene_alpha: f64,

    #[arg(long, value_enum, default_value_t = CorrectionArg::Bonferroni)]
    pub correction: CorrectionArg,

    #[command(flatten)]
    pub key: RunKeyArgs,
}

#[derive(Debug, Args)]
pub struct MergeOraArgs {
    #[arg(long, help = "Module summary slice written by `process`")]
    pub summary: PathBuf,

    #[arg(long, help = "ORA output directory with one subdirectory per GO branch")]
    pub ora_dir: PathBuf,

    #[arg(long, help = "Merged table path")]
    pub out: PathBuf,

    #[arg(long, default_value = ",")]
    pub ora_sep: String,

    #[command(flatten)]
    pub key: RunKeyArgs,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(required = true, num_args = 1.., help = "Per-replicate tables, in output order")]
    pub tables: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub process: ProcessArgs,

    #[arg(long)]
    pub ora_dir: PathBuf,

    #[arg(long, default_value = ",")]
    pub ora_sep: String,

    #[arg(long, help = "Merged table path (default: <out>/<study>_<trait>_<network>_merged.csv)")]
    pub merged_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CorrectionArg {
    Bonferroni,
    #[value(alias = "benjamini-hochberg")]
    Bh,
}
