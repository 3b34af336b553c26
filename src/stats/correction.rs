//! Family-wise and false-discovery-rate p-value adjustment.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorrectionMethod {
    #[default]
    Bonferroni,
    BenjaminiHochberg,
}

impl CorrectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::BenjaminiHochberg => "benjamini_hochberg",
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adjusted p-values in input order. The input must not contain NaN.
pub fn adjust(pvalues: &[f64], method: CorrectionMethod) -> Vec<f64> {
    match method {
        CorrectionMethod::Bonferroni => bonferroni(pvalues),
        CorrectionMethod::BenjaminiHochberg => benjamini_hochberg(pvalues),
    }
}

fn bonferroni(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len() as f64;
    pvalues.iter().map(|p| (p * n).min(1.0)).collect()
}

fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len();
    if n == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));

    let mut adjusted = vec![0.0; n];
    let mut running = 1.0f64;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let rank = (rank0 + 1) as f64;
        let q = (pvalues[idx] * n as f64 / rank).min(1.0);
        running = running.min(q);
        adjusted[idx] = running;
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonferroni_caps_at_one() {
        let adj = adjust(&[0.01, 0.2, 0.5], CorrectionMethod::Bonferroni);
        assert!((adj[0] - 0.03).abs() < 1e-12);
        assert!((adj[1] - 0.6).abs() < 1e-12);
        assert_eq!(adj[2], 1.0);
    }

    #[test]
    fn bh_matches_reference() {
        // p.adjust(c(0.01, 0.04, 0.03, 0.2), "BH")
        let adj = adjust(&[0.01, 0.04, 0.03, 0.2], CorrectionMethod::BenjaminiHochberg);
        let expected = [0.04, 0.0533333333, 0.0533333333, 0.2];
        for (a, e) in adj.iter().zip(expected) {
            assert!((a - e).abs() < 1e-8, "{} != {}", a, e);
        }
    }

    #[test]
    fn empty_input() {
        assert!(adjust(&[], CorrectionMethod::Bonferroni).is_empty());
        assert!(adjust(&[], CorrectionMethod::BenjaminiHochberg).is_empty());
    }
}
