use anyhow::Result;

use crate::aggregate::aggregate_to_dir;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage6Aggregate;

impl Stage6Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Aggregate {
    fn name(&self) -> &'static str {
        "stage6_aggregate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let (path, _table) = aggregate_to_dir(&ctx.aggregate_inputs, &ctx.output.out_dir)?;
        ctx.output.aggregated_path = Some(path);
        Ok(())
    }
}
