use crate::scorer::ModulePvalueRecord;
use crate::stats::correction::{CorrectionMethod, adjust};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedModule {
    pub module_index: i64,
    pub genes: Vec<String>,
    pub is_significant: bool,
    pub corrected_pvalue: f64,
    pub uncorrected_pvalue: f64,
}

/// Corrects all module p-values of one run together and flags those at or
/// below `alpha`. Output is ascending by corrected p-value; equal values
/// keep input order.
pub fn classify(
    records: &[ModulePvalueRecord],
    alpha: f64,
    method: CorrectionMethod,
) -> Vec<ClassifiedModule> {
    let pvalues: Vec<f64> = records.iter().map(|r| r.pvalue).collect();
    let corrected = adjust(&pvalues, method);

    let mut out: Vec<ClassifiedModule> = records
        .iter()
        .zip(corrected)
        .map(|(r, q)| ClassifiedModule {
            module_index: r.module_index,
            genes: r.genes.clone(),
            is_significant: q <= alpha,
            corrected_pvalue: q,
            uncorrected_pvalue: r.pvalue,
        })
        .collect();
    out.sort_by(|a, b| a.corrected_pvalue.total_cmp(&b.corrected_pvalue));
    out
}
