use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const SCORER_OUTPUT: &str = "[['1', ['g1', 'g2'], array([1.0e-09, 0.2]), 0.001],\n \
                             ['2', ['g3'], array([nan]), nan],\n \
                             ['3', ['g2', 'g3'], array([0.2, 0.5]), 0.4]]\n";

fn write_inputs(dir: &Path, scorer_output: &str) {
    fs::write(dir.join("twas_3-ABI_ppi.txt"), scorer_output).unwrap();
    fs::write(dir.join("GS_twas_3-ABI_ppi.tsv"), "g1\t1e-09\ng2\t0.2\ng3\t0.5\n").unwrap();
}

fn run_pipeline(input: &Path, out: &Path, ora: &Path) {
    let mut cmd = Command::cargo_bin("modenrich").unwrap();
    cmd.arg("run")
        .arg("--scorer-output")
        .arg(input.join("twas_3-ABI_ppi.txt"))
        .arg("--gene-scores")
        .arg(input.join("GS_twas_3-ABI_ppi.tsv"))
        .arg("--out")
        .arg(out)
        .arg("--ora-dir")
        .arg(ora);
    cmd.assert().success();
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn run_writes_summary_and_merged_tables() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path(), SCORER_OUTPUT);
    run_pipeline(input.path(), out.path(), &input.path().join("ora"));

    let summary = lines(&out.path().join("master_summary_slice_3.csv"));
    assert_eq!(summary.len(), 3);
    assert!(summary[1].starts_with("twas,3-ABI,ppi,1,true,0.001,0.002,2,1,['g1'],"));
    assert!(summary[2].starts_with("twas,3-ABI,ppi,3,false,0.4,0.8,2,0,[],"));

    let merged = lines(&out.path().join("twas_3-ABI_ppi_merged.csv"));
    assert_eq!(merged.len(), summary.len());
    assert!(merged[0].ends_with("MFmaxEnrichmentRatio"));
    assert!(merged[1].ends_with(",NA,NA,NA,NA,NA,NA,NA,NA"));
}

#[test]
fn nan_module_appears_in_no_output() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path(), SCORER_OUTPUT);
    run_pipeline(input.path(), out.path(), &input.path().join("ora"));

    let scorer_result = lines(&out.path().join("scorer_result.csv"));
    assert_eq!(scorer_result[0], "moduleIndex,moduleGenes,modulePval,correctedModulePval");
    let indices: Vec<&str> = scorer_result[1..]
        .iter()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(indices, vec!["1", "3"]);

    for name in ["master_summary_slice_3.csv", "twas_3-ABI_ppi_merged.csv"] {
        assert!(lines(&out.path().join(name))
            .iter()
            .skip(1)
            .all(|l| !l.starts_with("twas,3-ABI,ppi,2,")));
    }
}

#[test]
fn run_report_records_counts_and_thresholds() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path(), SCORER_OUTPUT);
    run_pipeline(input.path(), out.path(), &input.path().join("ora"));

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("run_report.json")).unwrap()).unwrap();
    assert_eq!(v["tool"]["name"], "modenrich");
    assert_eq!(v["run"]["study"], "twas");
    assert_eq!(v["run"]["trait"], "3-ABI");
    assert_eq!(v["modules"]["parsed"], 3);
    assert_eq!(v["modules"]["dropped_nan"], 1);
    assert_eq!(v["modules"]["tested"], 2);
    assert_eq!(v["thresholds"]["num_tests"], 3);
    assert_eq!(v["thresholds"]["correction"], "bonferroni");
    assert_eq!(v["significant_modules"], serde_json::json!([1]));
}

#[test]
fn significant_module_gene_lists_are_written() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path(), SCORER_OUTPUT);
    run_pipeline(input.path(), out.path(), &input.path().join("ora"));

    let sig = out.path().join("significant_modules").join("sig_twas_3-ABI_ppi_1.txt");
    assert_eq!(lines(&sig), vec!["g1", "g2"]);
}

#[test]
fn process_without_significant_module_leaves_marker() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(
        input.path(),
        "['1', ['g2'], array([0.2]), 0.3]\n['2', ['g3'], array([0.5]), 0.6]\n",
    );
    let mut cmd = Command::cargo_bin("modenrich").unwrap();
    cmd.arg("process")
        .arg("--scorer-output")
        .arg(input.path().join("twas_3-ABI_ppi.txt"))
        .arg("--gene-scores")
        .arg(input.path().join("GS_twas_3-ABI_ppi.tsv"))
        .arg("--out")
        .arg(out.path());
    cmd.assert().success();

    let marker = out.path().join("significant_modules").join("nosig_twas_3-ABI_ppi.txt");
    assert_eq!(lines(&marker), vec!["-1"]);
}

#[test]
fn malformed_scorer_output_fails_before_writing() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path(), "['1', ['g1'], array([0.1]), 0.05");
    let mut cmd = Command::cargo_bin("modenrich").unwrap();
    cmd.arg("process")
        .arg("--scorer-output")
        .arg(input.path().join("twas_3-ABI_ppi.txt"))
        .arg("--gene-scores")
        .arg(input.path().join("GS_twas_3-ABI_ppi.tsv"))
        .arg("--out")
        .arg(out.path());
    cmd.assert().failure();
    assert!(!out.path().join("master_summary_slice_3.csv").exists());
}

#[test]
fn reconcile_then_merge_then_aggregate() {
    let input = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(input.path().join("ABI.csv"), "Gene,Pvalue\ng1,1e-9\ng2,0.2\ng9,0.1\n").unwrap();
    fs::write(input.path().join("ppi.txt"), "1 1.0 g1 g2 x\n2 1.0 y\n").unwrap();

    let mut cmd = Command::cargo_bin("modenrich").unwrap();
    cmd.arg("reconcile")
        .arg("--scores")
        .arg(input.path().join("ABI.csv"))
        .arg("--modules")
        .arg(input.path().join("ppi.txt"))
        .arg("--out")
        .arg(work.path())
        .args(["--study", "twas", "--trait", "ABI"]);
    cmd.assert().success();
    assert_eq!(
        fs::read_to_string(work.path().join("Module_twas_ABI_ppi.tsv")).unwrap(),
        "1\tg1\tg2\n2\n"
    );
    assert_eq!(lines(&work.path().join("GO_twas_ABI_ppi.txt")), vec!["g1", "g2"]);

    write_inputs(input.path(), SCORER_OUTPUT);
    let mut paths = Vec::new();
    for seed in ["1", "2"] {
        let out = work.path().join(format!("rp{}", seed));
        let mut cmd = Command::cargo_bin("modenrich").unwrap();
        cmd.arg("process")
            .arg("--scorer-output")
            .arg(input.path().join("twas_3-ABI_ppi.txt"))
            .arg("--gene-scores")
            .arg(input.path().join("GS_twas_3-ABI_ppi.tsv"))
            .arg("--out")
            .arg(&out)
            .args(["--study", "twas", "--network", "ppi"])
            .arg("--trait")
            .arg(format!("{}-ABI", seed));
        cmd.assert().success();

        let merged = work.path().join(format!("twas_{}-ABI_ppi_merged.csv", seed));
        let mut cmd = Command::cargo_bin("modenrich").unwrap();
        cmd.arg("merge-ora")
            .arg("--summary")
            .arg(out.join(format!("master_summary_slice_{}.csv", seed)))
            .arg("--ora-dir")
            .arg(input.path().join("ora"))
            .arg("--out")
            .arg(&merged);
        cmd.assert().success();
        paths.push(merged);
    }

    let mut cmd = Command::cargo_bin("modenrich").unwrap();
    cmd.arg("aggregate").arg("--out-dir").arg(work.path()).args(&paths);
    cmd.assert().success();

    let cohort = lines(&work.path().join("master_summary_ABI_ppi_RP.csv"));
    assert_eq!(cohort.len(), 1 + 2 + 2);
    assert!(cohort[1].starts_with("twas,1-ABI,ppi,1,"));
    assert!(cohort[3].starts_with("twas,2-ABI,ppi,1,"));
}
