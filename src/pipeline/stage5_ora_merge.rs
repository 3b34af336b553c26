use anyhow::{Context, Result, bail};
use tracing::info;

use crate::aggregate::merged_table_name;
use crate::ctx::Ctx;
use crate::io::summary_writer::{read_summary_table, write_master_table};
use crate::ora::merge_from_dir;
use crate::pipeline::Stage;

pub struct Stage5OraMerge;

impl Stage5OraMerge {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5OraMerge {
    fn name(&self) -> &'static str {
        "stage5_ora_merge"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let cfg = ctx.ora.clone().context("ORA configuration missing")?;
        let records = match &ctx.summary {
            Some(summary) => summary.records.clone(),
            None => {
                let path = cfg
                    .summary
                    .as_ref()
                    .context("no module summary built and no summary table given")?;
                read_summary_table(path)?
            }
        };

        if ctx.run_key.is_none() {
            ctx.run_key = records.first().map(|r| r.run.clone());
        }
        if let Some(run) = &ctx.run_key {
            if let Some(other) = records.iter().find(|r| r.run != *run) {
                bail!(
                    "module summary mixes runs: expected {}, found {} (module {})",
                    run,
                    other.run,
                    other.module_index
                );
            }
        }

        let (table, merged) =
            merge_from_dir(&records, &cfg.ora_dir, ctx.run_key.as_ref(), cfg.sep)?;

        let out_path = match (&cfg.merged_out, &ctx.run_key) {
            (Some(path), _) => path.clone(),
            (None, Some(run)) => ctx.output.out_dir.join(merged_table_name(run)),
            (None, None) => {
                bail!("cannot name the merged table: run key unknown and --out not given")
            }
        };
        write_master_table(&out_path, &merged)?;

        info!(
            merged = %out_path.display(),
            rows = merged.len(),
            "master_table_written"
        );
        ctx.output.merged_path = Some(out_path);
        ctx.ora_table = Some(table);
        ctx.master = merged;
        Ok(())
    }
}
