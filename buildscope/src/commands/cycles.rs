//! Cycles - circular dependency check over an artifact snapshot

use buildscope::events::load_artifacts;
use buildscope::{DependencyGraph, build_dependency_graph};
use std::path::Path;

pub fn execute(artifacts: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let graph = DependencyGraph::new(build_dependency_graph(load_artifacts(artifacts)?));
    tracing::info!(
        "Checking {} artifacts with {} dependency edges",
        graph.node_count(),
        graph.edge_count()
    );

    let cycles = graph.find_cycles();
    if cycles.is_empty() {
        println!("✅ No circular dependencies");
        return Ok(());
    }

    println!("🔁 {} circular dependencies:", cycles.len());
    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {}. {}", i + 1, cycle.join(" → "));
    }
    Ok(())
}
