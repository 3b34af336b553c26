#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(parsed) = modenrich::scorer::parse(&text) {
        // Every tested module carries a real p-value.
        assert!(parsed.records.iter().all(|r| !r.pvalue.is_nan()));
    }
});
