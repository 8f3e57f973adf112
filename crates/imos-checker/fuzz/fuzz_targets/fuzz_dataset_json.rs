//! Fuzz target for the JSON dataset loader and a full check.
//!
//! Malformed JSON must come back as an error, and any dataset that loads
//! must check without panicking.

#![no_main]

use imos_checker::{Dataset, ImosChecker};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(dataset) = Dataset::from_json_str(json) {
        let report = ImosChecker::new().check(&dataset);
        assert_eq!(
            report.summary.total,
            report.summary.passed + report.summary.failed
        );
        let _ = report.to_json();
    }
});
