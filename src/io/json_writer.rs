use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::io::create_buffered;
use crate::schema::v1::RunReport;

pub const RUN_REPORT_FILE: &str = "run_report.json";

pub fn write_run_report(path: &Path, report: &RunReport) -> Result<()> {
    let mut w = create_buffered(path)?;
    serde_json::to_writer_pretty(&mut w, report)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}
