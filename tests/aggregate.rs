use std::fs;
use std::path::{Path, PathBuf};

use modenrich::aggregate::{aggregate, aggregate_to_dir};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn row_count_is_sum_of_inputs() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "twas_1-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,1\ntwas,2\n");
    let b = write(tmp.path(), "twas_2-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,1\n");
    let table = aggregate(&[a, b]).unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.headers.iter().collect::<Vec<_>>(), vec!["study", "moduleIndex"]);
}

#[test]
fn identical_rows_are_not_deduplicated() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "twas_1-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,1\n");
    let table = aggregate(&[a.clone(), a]).unwrap();
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn schema_mismatch_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "twas_1-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,1\n");
    let b = write(tmp.path(), "twas_2-ABI_ppi_merged.csv", "study,moduleIndex,extra\ntwas,1,x\n");
    let err = aggregate(&[a, b]).unwrap_err();
    assert!(err.to_string().contains("schema mismatch"));
}

#[test]
fn cohort_table_is_named_after_trait_and_network() {
    let tmp = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write(tmp.path(), "twas_1-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,1\n");
    let b = write(tmp.path(), "twas_2-ABI_ppi_merged.csv", "study,moduleIndex\ntwas,4\n");
    let (path, _) = aggregate_to_dir(&[a, b], out.path()).unwrap();
    assert_eq!(path, out.path().join("master_summary_ABI_ppi_RP.csv"));
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "study,moduleIndex\ntwas,1\ntwas,4\n"
    );
}
