use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::json_writer::{RUN_REPORT_FILE, write_run_report};
use crate::io::summary_writer::{
    SCORER_RESULT_FILE, summary_slice_name, write_no_significant_marker, write_scorer_result,
    write_significant_modules, write_summary_table,
};
use crate::pipeline::Stage;
use crate::schema::v1::{ModuleCounts, RunReport, Thresholds, ToolMeta};
use crate::summary;

pub struct Stage4Summary;

impl Stage4Summary {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Summary {
    fn name(&self) -> &'static str {
        "stage4_summary"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cfg = ctx
            .process
            .clone()
            .context("process configuration missing")?;
        let run = ctx.run_key()?.clone();
        let tiers = ctx.gene_tiers.as_ref().context("gene tiers missing")?;
        let thresholds = ctx.thresholds.context("gene thresholds missing")?;
        let parsed = ctx.parsed.as_ref().context("scorer output not parsed")?;

        let summary = summary::build(&run, &ctx.classified, tiers);

        let out_dir = ctx.output.out_dir.clone();
        let summary_path = out_dir.join(summary_slice_name(run.replicate()));
        write_summary_table(&summary_path, &summary.records)?;
        let scorer_result_path = out_dir.join(SCORER_RESULT_FILE);
        write_scorer_result(&scorer_result_path, &parsed.records, &ctx.classified)?;

        let stem = cfg
            .scorer_output
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| run.stem());
        if summary.has_significant() {
            ctx.output.significant_module_paths =
                write_significant_modules(&cfg.sig_modules_out, &stem, &summary.significant)?;
        } else {
            ctx.output.no_significant_marker =
                Some(write_no_significant_marker(&cfg.sig_modules_out, &stem)?);
        }

        let report = RunReport {
            tool: ToolMeta {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: ctx.tool_version.clone(),
            },
            run: run.clone(),
            scorer_output: cfg.scorer_output.display().to_string(),
            thresholds: Thresholds {
                module_alpha: cfg.alpha,
                correction: cfg.correction.to_string(),
                num_tests: ctx.num_tests.unwrap_or(0) as u64,
                gene_base: thresholds.base(),
                gene_tiers: thresholds.values().to_vec(),
            },
            modules: ModuleCounts {
                parsed: parsed.total() as u64,
                dropped_nan: parsed.dropped_nan.len() as u64,
                tested: summary.records.len() as u64,
                significant: summary.significant.len() as u64,
            },
            significant_modules: summary.significant.keys().copied().collect(),
            warnings: ctx.warnings.clone(),
        };
        let report_path = out_dir.join(RUN_REPORT_FILE);
        write_run_report(&report_path, &report)?;

        info!(
            summary = %summary_path.display(),
            significant = summary.significant.len(),
            "module_summary_written"
        );

        ctx.output.summary_path = Some(summary_path);
        ctx.output.scorer_result_path = Some(scorer_result_path);
        ctx.output.report_path = Some(report_path);
        ctx.summary = Some(summary);
        Ok(())
    }
}
