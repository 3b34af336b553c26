use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_process_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let run = ctx.run_key()?;
    let parsed = ctx.parsed.as_ref().context("scorer output not parsed")?;
    let summary = ctx.summary.as_ref().context("module summary missing")?;

    let mut out = String::new();
    out.push_str(&format!("modenrich v{}\n", version));
    out.push_str(&format!("Run: {}\n", run));
    out.push_str(&format!(
        "Modules: {} parsed, {} tested, {} excluded (nan)\n",
        parsed.total(),
        parsed.records.len(),
        parsed.dropped_nan.len()
    ));
    if let Some(t) = &ctx.thresholds {
        out.push_str(&format!(
            "Gene threshold: {:e} over {} tests\n",
            t.base(),
            ctx.num_tests.unwrap_or(0)
        ));
    }

    let sig: Vec<String> = summary.significant.keys().map(|k| k.to_string()).collect();
    if sig.is_empty() {
        out.push_str("Significant: none\n");
    } else {
        out.push_str(&format!("Significant: {}\n", sig.join(", ")));
    }
    Ok(out)
}
