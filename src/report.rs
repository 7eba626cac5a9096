use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::types::{ProbeOutcome, ProbeReport};

/// Write the report as pretty-printed JSON to the given path
pub fn write_report(report: &ProbeReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    info!("Report saved to {}", path.display());
    Ok(())
}

/// Human-readable run summary on stdout
pub fn print_summary(report: &ProbeReport) {
    let s = &report.summary;

    println!("Probe results for {}", report.target);
    println!("Total Elements: {}", s.total_elements);
    println!("Visible Elements: {}", s.visible_count);
    println!("Enabled Elements: {}", s.enabled_count);
    println!("Functional Elements: {}", s.functional_count);
    println!("Non-Functional Elements: {}", s.non_functional_count);
    if s.skipped_count > 0 {
        println!("Skipped Elements: {}", s.skipped_count);
    }
    println!("Functionality Rate: {:.1}%", s.functionality_rate);

    if let Some(err) = &report.navigation_error {
        println!("\nNavigation error: {}", err);
    }

    let non_functional: Vec<_> = report
        .results
        .iter()
        .filter(|e| e.outcome == ProbeOutcome::NonFunctional)
        .collect();
    if !non_functional.is_empty() {
        println!("\nNon-functional elements:");
        for element in non_functional {
            println!(
                "- \"{}\" ({})",
                element.label,
                element.error_detail.as_deref().unwrap_or("no detail")
            );
        }
    }

    let functional: Vec<_> = report
        .results
        .iter()
        .filter(|e| e.outcome == ProbeOutcome::Functional)
        .collect();
    if !functional.is_empty() {
        println!("\nFunctional elements:");
        for element in functional {
            println!("- \"{}\"", element.label);
        }
    }

    if !report.page_errors.is_empty() {
        println!("\nConsole errors ({}):", report.page_errors.len());
        for err in &report.page_errors {
            println!("- {}", err);
        }
    }
}
