use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut dirs = vec![ctx.output.out_dir.clone()];
        if let Some(process) = &ctx.process {
            dirs.push(process.sig_modules_out.clone());
        }
        if let Some(parent) = ctx
            .ora
            .as_ref()
            .and_then(|ora| ora.merged_out.as_ref())
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
        {
            dirs.push(parent.to_path_buf());
        }

        // create_dir_all succeeds on existing directories.
        for dir in &dirs {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        info!(
            out_dir = %ctx.output.out_dir.display(),
            dirs = dirs.len(),
            "output_dir_ready"
        );
        Ok(())
    }
}
