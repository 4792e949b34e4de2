// src/cli.rs
use crate::config::options::Family;
use crate::error::Result;
use crate::progress::{ConsoleProgress, Progress};
use crate::runner::{self, RunSummary};

/// No-argument entry point shared by the per-family binaries.
pub fn run(family: Family) -> Result<RunSummary> {
    let mut progress = ConsoleProgress::default();
    progress.log(&format!("Generating {family} device catalog..."));

    let summary = runner::run_family(family, Some(&mut progress))?;

    println!(
        "Done: {} saved to {} (using {})",
        family,
        summary.path.display(),
        summary.xcode_version
    );
    println!("Total {family} models generated: {}", summary.records);
    if !summary.audit.duplicates.is_empty() {
        println!("Duplicate names found: {}", summary.audit.duplicates.len());
    }
    Ok(summary)
}
