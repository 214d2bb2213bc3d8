//! Compare - diff two finalized build reports

use buildscope::compare_reports;
use buildscope::format::format_duration;
use buildscope::reports::load_report;
use std::path::Path;

pub fn execute(previous: &Path, current: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let previous = load_report(previous)?;
    let current = load_report(current)?;
    let comparison = compare_reports(&previous, &current);

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!(
        "Build time: {} → {} ({}), {}",
        format_duration(previous.total_duration),
        format_duration(current.total_duration),
        comparison.duration_change,
        comparison.performance_trend
    );

    if !comparison.new_slow_modules.is_empty() {
        println!("\nNew slow units:");
        for unit in &comparison.new_slow_modules {
            println!("  + {} ({:.0}ms)", unit.id, unit.duration);
        }
    }
    if !comparison.removed_slow_modules.is_empty() {
        println!("\nNo longer slow:");
        for unit in &comparison.removed_slow_modules {
            println!("  - {} ({:.0}ms)", unit.id, unit.duration);
        }
    }

    Ok(())
}
