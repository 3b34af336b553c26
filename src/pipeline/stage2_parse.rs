use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::schema::v1::RunKey;
use crate::scorer;

pub struct Stage2Parse;

impl Stage2Parse {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Parse {
    fn name(&self) -> &'static str {
        "stage2_parse"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let path = ctx
            .process
            .as_ref()
            .context("process configuration missing")?
            .scorer_output
            .clone();
        if ctx.run_key.is_none() {
            ctx.run_key = Some(RunKey::from_path(&path)?);
        }

        let parsed = scorer::parse_file(&path)?;
        for module in &parsed.dropped_nan {
            warn!(module, "module_pvalue_nan_excluded");
        }
        if parsed.records.is_empty() {
            ctx.warnings
                .push(format!("{} contains no testable module", path.display()));
        }

        info!(
            run = %ctx.run_key()?,
            modules = parsed.total(),
            tested = parsed.records.len(),
            dropped_nan = parsed.dropped_nan.len(),
            "scorer_output_parsed"
        );
        ctx.parsed = Some(parsed);
        Ok(())
    }
}
