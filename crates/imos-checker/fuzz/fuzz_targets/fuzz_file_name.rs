//! Fuzz target for file name parsing and the file name rules.
//!
//! Parsing must accept any string, and no file name rule may panic or
//! report a dataset error.

#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use imos_checker::file_name::FileName;
use imos_checker::{Attribute, DatasetBuilder, FileNameValidator, Validator};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    location: String,
    file_version: Option<String>,
}

fuzz_target!(|input: Input| {
    let name = FileName::parse(&input.location);
    let _ = name.field(6);
    assert_eq!(name.fields.join("_"), name.base);

    let mut builder = DatasetBuilder::new(input.location);
    if let Some(version) = input.file_version {
        builder = builder.global_attribute("file_version", Attribute::text(version));
    }
    let dataset = builder.build();

    for report in FileNameValidator.validate(&dataset, &BTreeSet::new()) {
        assert!(report.error.is_none());
    }
});
