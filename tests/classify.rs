use modenrich::io::gene_scores::GeneScoreMap;
use modenrich::scorer::ModulePvalueRecord;
use modenrich::stats::{CorrectionMethod, SigGeneTiers, TIER_COUNT, TierThresholds, classify};

fn module(index: i64, genes: &[&str], pvalue: f64) -> ModulePvalueRecord {
    ModulePvalueRecord {
        module_index: index,
        genes: genes.iter().map(|g| g.to_string()).collect(),
        pvalue,
    }
}

#[test]
fn classify_sorts_by_corrected_pvalue_and_flags_at_alpha() {
    let records = vec![
        module(1, &["A"], 0.2),
        module(2, &["B"], 0.0125),
        module(3, &["C"], 0.001),
        module(4, &["D"], 0.2),
    ];
    let out = classify(&records, 0.05, CorrectionMethod::Bonferroni);

    let order: Vec<i64> = out.iter().map(|m| m.module_index).collect();
    assert_eq!(order, vec![3, 2, 1, 4]);
    assert!(out[0].is_significant);
    // 0.0125 * 4 lands exactly on alpha.
    assert!(out[1].is_significant);
    assert!(!out[2].is_significant);
    assert_eq!(out[2].corrected_pvalue, 0.8);
    assert_eq!(out[2].uncorrected_pvalue, 0.2);
}

#[test]
fn classify_without_modules_is_empty() {
    assert!(classify(&[], 0.05, CorrectionMethod::Bonferroni).is_empty());
}

#[test]
fn tiers_nest_from_tightest_to_widest() {
    let scores = GeneScoreMap::from_pairs(vec![
        ("A".to_string(), 1e-6),
        ("B".to_string(), 3e-5),
        ("C".to_string(), 2e-3),
        ("D".to_string(), 0.04),
        ("E".to_string(), 0.9),
        ("F".to_string(), f64::NAN),
    ]);
    let thresholds = TierThresholds::from_num_tests(0.05, 10_000).unwrap();
    let tiers = SigGeneTiers::build(&scores, &thresholds);

    for gene in ["A", "B", "C", "D", "E", "F"] {
        for tier in 1..TIER_COUNT {
            if tiers.contains(tier - 1, gene) {
                assert!(tiers.contains(tier, gene), "{} missing from tier {}", gene, tier);
            }
        }
    }
    assert!(tiers.contains(0, "A"));
    assert!(!tiers.contains(0, "B"));
    assert!(tiers.contains(1, "B"));
    assert!(tiers.contains(3, "C"));
    assert!(tiers.contains(4, "D"));
    assert!(!tiers.contains(4, "E"));
    assert!(!tiers.contains(4, "F"));
}

#[test]
fn gene_on_threshold_does_not_qualify() {
    let scores = GeneScoreMap::from_pairs(vec![("A".to_string(), 0.05)]);
    let thresholds = TierThresholds::from_num_tests(0.05, 1).unwrap();
    let tiers = SigGeneTiers::build(&scores, &thresholds);
    assert!(!tiers.contains(0, "A"));
    assert!(tiers.contains(1, "A"));
}

#[test]
fn split_keeps_module_gene_order() {
    let scores = GeneScoreMap::from_pairs(vec![
        ("A".to_string(), 1e-9),
        ("B".to_string(), 1e-9),
        ("C".to_string(), 0.5),
    ]);
    let tiers = SigGeneTiers::build(&scores, &TierThresholds::new(1e-6).unwrap());
    let genes: Vec<String> = ["B", "C", "Z", "A"].iter().map(|g| g.to_string()).collect();
    let split = tiers.split(&genes);
    assert_eq!(split[0], vec!["B", "A"]);
    assert_eq!(split[4], vec!["B", "A"]);
}

#[test]
fn zero_tests_is_an_error() {
    assert!(TierThresholds::from_num_tests(0.05, 0).is_err());
}
