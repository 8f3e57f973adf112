//! Example: Check a JSON dataset dump against the IMOS conventions.
//!
//! Usage:
//!   cargo run --example check -- <dataset.json> [config.json]
//!
//! Example:
//!   cargo run --example check -- crates/imos-checker/tests/data/imos_good.json

use std::env;
use std::fs;
use std::path::Path;

use imos_checker::{CheckerConfig, Dataset, ImosChecker, ImosError};

fn main() -> imos_checker::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example check -- <dataset.json> [config.json]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(config_path) => {
            let content = fs::read_to_string(config_path).map_err(|source| ImosError::Io {
                path: config_path.into(),
                source,
            })?;
            CheckerConfig::from_json_str(&content)?
        }
        None => CheckerConfig::default(),
    };

    let checker = ImosChecker::with_config(config)?;
    let dataset = Dataset::from_json_file(path)?;
    let report = checker.check(&dataset);

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("IMOS check: {}", report.source_location);
    println!("{}", separator);
    println!();

    println!("## Variables");
    match checker.classify(&dataset) {
        Ok(classes) => {
            for (id, variable) in dataset.variables() {
                println!("  {:32} {:?}", variable.name, classes.role(id));
            }
        }
        Err(e) => println!("  roles unavailable: {}", e),
    }
    println!();

    println!("## Rules");
    for rule in &report.rules {
        let status = match (&rule.error, rule.passed()) {
            (Some(_), _) => "ERROR",
            (None, true) => "PASS",
            (None, false) => "FAIL",
        };
        println!("  [{:5}] {:10} {}", status, rule.suite, rule.rule);

        if let Some(error) = &rule.error {
            println!("           could not be evaluated: {}", error);
        }
        for failure in rule.failures() {
            println!(
                "           {} ({}): {}",
                failure.display_name(),
                failure.priority.label(),
                failure.reasons.join("; ")
            );
        }
    }

    println!();
    println!("## Summary");
    println!("  Checks: {}", report.summary.total);
    println!("  Passed: {}", report.summary.passed);
    println!("  Failed: {}", report.summary.failed);
    println!("  Rules not evaluated: {}", report.summary.errored_rules);
    println!("  Score: {:.0}%", report.summary.score * 100.0);

    if env::var("IMOS_REPORT_JSON").is_ok() {
        println!();
        println!("{}", report.to_json()?);
    }

    Ok(())
}
