//! Reader for the pathway scorer's textual result dump.
//!
//! The scorer prints one Python-style tuple per module:
//!
//! ```text
//! ['5', ['GENE1', 'GENE2'], array([0.013, 0.41]), 0.0021]
//! ```
//!
//! Modules the scorer could not evaluate carry `nan` as their p-value and
//! are split off here, before any multiple-testing correction.

use std::path::Path;

use anyhow::{Context, Result};

pub mod error;
pub mod lexer;
mod parser;

pub use error::ScorerParseError;
pub use parser::{ScorerRecord, parse_records};

/// A module that contributes one hypothesis to the correction step.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePvalueRecord {
    pub module_index: i64,
    pub genes: Vec<String>,
    pub pvalue: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedScorerOutput {
    pub records: Vec<ModulePvalueRecord>,
    /// Indices of modules reported with a `nan` p-value, in input order.
    pub dropped_nan: Vec<i64>,
}

impl ParsedScorerOutput {
    pub fn total(&self) -> usize {
        self.records.len() + self.dropped_nan.len()
    }
}

pub fn parse(raw: &str) -> Result<ParsedScorerOutput, ScorerParseError> {
    let mut out = ParsedScorerOutput::default();
    for record in parse_records(raw)? {
        if record.pvalue.is_nan() {
            out.dropped_nan.push(record.module_index);
        } else {
            out.records.push(ModulePvalueRecord {
                module_index: record.module_index,
                genes: record.genes,
                pvalue: record.pvalue,
            });
        }
    }
    Ok(out)
}

pub fn parse_file(path: &Path) -> Result<ParsedScorerOutput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scorer output {}", path.display()))?;
    let parsed =
        parse(&raw).with_context(|| format!("malformed scorer output {}", path.display()))?;
    Ok(parsed)
}
