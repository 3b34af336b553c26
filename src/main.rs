use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modenrich::cli::{Cli, Commands, CorrectionArg, ProcessArgs, RunKeyArgs};
use modenrich::ctx::{Ctx, OraConfig, ProcessConfig, ReconcileConfig};
use modenrich::io;
use modenrich::pipeline::Pipeline;
use modenrich::pipeline::stage0_scaffold::Stage0Scaffold;
use modenrich::pipeline::stage1_reconcile::Stage1Reconcile;
use modenrich::pipeline::stage2_parse::Stage2Parse;
use modenrich::pipeline::stage3_classify::Stage3Classify;
use modenrich::pipeline::stage4_summary::Stage4Summary;
use modenrich::pipeline::stage5_ora_merge::Stage5OraMerge;
use modenrich::pipeline::stage6_aggregate::Stage6Aggregate;
use modenrich::schema::v1::RunKey;
use modenrich::stats::CorrectionMethod;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let version = env!("CARGO_PKG_VERSION");

    match cli.command {
        Commands::Reconcile(args) => {
            let mut ctx = Ctx::new(args.out, version);
            ctx.reconcile = Some(ReconcileConfig {
                scores: args.scores,
                modules: args.modules,
                gene_col: args.gene_col,
                pval_col: args.pval_col,
                sep: io::parse_delimiter(&args.sep)?,
                study: args.study,
                trait_name: args.trait_name,
            });

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Reconcile::new()),
            ]);
            pipeline.run(&mut ctx)?;

            for out in &ctx.reconciled {
                println!(
                    "{}\t{} modules\t{} genes dropped",
                    out.module_path.display(),
                    out.reconciled.modules.len(),
                    out.reconciled.dropped
                );
            }
            print_warnings(&ctx);
        }
        Commands::Process(args) => {
            let mut ctx = process_ctx(args, version);
            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage2Parse::new()),
                Box::new(Stage3Classify::new()),
                Box::new(Stage4Summary::new()),
            ]);
            pipeline.run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::MergeOra(args) => {
            let out_dir = args
                .out
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| ".".into());
            let mut ctx = Ctx::new(out_dir, version);
            ctx.run_key = resolve_run_key(&args.key);
            ctx.ora = Some(OraConfig {
                ora_dir: args.ora_dir,
                sep: io::parse_delimiter(&args.ora_sep)?,
                summary: Some(args.summary),
                merged_out: Some(args.out),
            });

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage5OraMerge::new()),
            ]);
            pipeline.run(&mut ctx)?;

            if let Some(path) = &ctx.output.merged_path {
                println!("{}\t{} rows", path.display(), ctx.master.len());
            }
            print_warnings(&ctx);
        }
        Commands::Aggregate(args) => {
            let mut ctx = Ctx::new(args.out_dir, version);
            ctx.aggregate_inputs = args.tables;

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage6Aggregate::new()),
            ]);
            pipeline.run(&mut ctx)?;

            if let Some(path) = &ctx.output.aggregated_path {
                println!("{}", path.display());
            }
        }
        Commands::Run(args) => {
            let sep = io::parse_delimiter(&args.ora_sep)?;
            let mut ctx = process_ctx(args.process, version);
            ctx.ora = Some(OraConfig {
                ora_dir: args.ora_dir,
                sep,
                summary: None,
                merged_out: args.merged_out,
            });

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage2Parse::new()),
                Box::new(Stage3Classify::new()),
                Box::new(Stage4Summary::new()),
                Box::new(Stage5OraMerge::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_summary(&ctx)?;
            if let Some(path) = &ctx.output.merged_path {
                println!("Merged: {}", path.display());
            }
        }
    }

    Ok(())
}

fn process_ctx(args: ProcessArgs, version: &str) -> Ctx {
    let sig_modules_out = args
        .sig_modules_out
        .unwrap_or_else(|| args.out.join("significant_modules"));
    let mut ctx = Ctx::new(args.out, version);
    ctx.run_key = resolve_run_key(&args.key);
    ctx.process = Some(ProcessConfig {
        scorer_output: args.scorer_output,
        gene_scores: args.gene_scores,
        sig_modules_out,
        alpha: args.alpha,
        gene_alpha: args.gene_alpha,
        num_tests: args.num_tests,
        correction: match args.correction {
            CorrectionArg::Bonferroni => CorrectionMethod::Bonferroni,
            CorrectionArg::Bh => CorrectionMethod::BenjaminiHochberg,
        },
    });
    ctx
}

// clap enforces that the three flags come together.
fn resolve_run_key(args: &RunKeyArgs) -> Option<RunKey> {
    match (&args.study, &args.trait_name, &args.network) {
        (Some(s), Some(t), Some(n)) => Some(RunKey::new(s, t, n)),
        _ => None,
    }
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::console::format_process_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
