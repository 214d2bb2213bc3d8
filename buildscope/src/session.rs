//! Build session: owns the in-progress report for one build invocation
//!
//! The host feeds the session one event per discovered and processed unit,
//! hands over the emitted artifacts, and finally calls
//! [`BuildSession::finish`], which consumes the session and returns the
//! immutable [`BuildReport`].

use crate::advisor::Advisor;
use crate::config::InsightConfig;
use crate::format::{format_duration, normalize_path};
use crate::model::{BuildReport, ProgressSnapshot, UnitRecord};
use crate::progress;
use crate::stats;
use buildscope_graph::{ArtifactMeta, build_dependency_graph, find_cycles};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Number of slow units listed in the finish summary
const SUMMARY_SLOWEST: usize = 5;

/// Where this tool's own files live when installed into a project
const OWN_PACKAGE_PATH: &str = "/node_modules/buildscope/";

/// A unit finished processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEvent {
    /// Raw identifier as reported by the host
    pub id: String,
    /// Content length in bytes
    pub size: u64,
    pub start_time: f64,
    pub end_time: f64,
}

/// What happened to a unit event
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// Measured and appended to the report
    Recorded(UnitRecord),
    /// Already measured earlier in this build; carries the first measurement
    Cached(UnitRecord),
    /// Filtered out, never measured
    Skipped,
}

/// Units already measured in the current build, keyed by raw id.
///
/// Lives exactly as long as one [`BuildSession`].
#[derive(Debug, Default)]
pub struct UnitCache {
    entries: HashMap<String, UnitRecord>,
    hits: usize,
}

impl UnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a unit, counting a hit when present
    pub fn lookup(&mut self, id: &str) -> Option<&UnitRecord> {
        let entry = self.entries.get(id);
        if entry.is_some() {
            self.hits += 1;
        }
        entry
    }

    pub fn insert(&mut self, id: String, record: UnitRecord) {
        let _ = self.entries.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Whether a unit id is worth measuring.
///
/// Third-party code is skipped except stylesheets, as are the report
/// itself, this tool's own files and bundler-internal virtual modules.
pub fn should_measure(id: &str) -> bool {
    if id.contains("node_modules") && !id.contains(".css") {
        return false;
    }
    if id.contains("build-report.html") || normalize_path(id).contains(OWN_PACKAGE_PATH) {
        return false;
    }
    !(id.starts_with('\0') || id.contains("virtual:") || id.contains("__vite_"))
}

/// Measure one unit, consulting and filling `cache` when given.
pub fn process_unit(cache: Option<&mut UnitCache>, event: UnitEvent) -> UnitOutcome {
    let mut cache = cache;
    if let Some(cache) = cache.as_deref_mut() {
        if let Some(record) = cache.lookup(&event.id) {
            return UnitOutcome::Cached(record.clone());
        }
    }

    if !should_measure(&event.id) {
        return UnitOutcome::Skipped;
    }

    let record = UnitRecord::new(
        normalize_path(&event.id),
        event.size,
        event.start_time,
        event.end_time,
    );
    if let Some(cache) = cache {
        cache.insert(event.id, record.clone());
    }
    UnitOutcome::Recorded(record)
}

/// Orchestrates measurement for a single build
#[derive(Debug)]
pub struct BuildSession {
    config: InsightConfig,
    report: BuildReport,
    cache: UnitCache,
    processed_count: usize,
    total_modules: usize,
}

impl BuildSession {
    /// Start a build at `now` (milliseconds)
    pub fn start(config: InsightConfig, now: f64) -> Self {
        info!("Collecting build performance data");
        if config.enable_progress {
            debug!(
                "Progress estimation enabled after {} units",
                config.progress_skip_first_n
            );
        }

        Self {
            config,
            report: BuildReport::empty(now),
            cache: UnitCache::new(),
            processed_count: 0,
            total_modules: 0,
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn total_modules(&self) -> usize {
        self.total_modules
    }

    pub fn cache(&self) -> &UnitCache {
        &self.cache
    }

    /// A unit was discovered; returns a progress estimate when one is due.
    pub fn unit_discovered(&mut self, now: f64) -> Option<ProgressSnapshot> {
        self.total_modules += 1;

        if !self.config.enable_progress || self.processed_count == 0 {
            return None;
        }

        let snapshot = progress::estimate(
            self.processed_count,
            self.total_modules,
            self.report.start_time,
            now,
            self.config.progress_skip_first_n,
        )?;

        info!(
            "Progress: {}/{} ({:.1}%) - estimated remaining: {:.1}s",
            snapshot.processed_count,
            snapshot.total_modules,
            snapshot.percent(),
            snapshot.display_remaining() / 1000.0
        );
        Some(snapshot)
    }

    /// A unit finished processing
    pub fn record_unit(&mut self, event: UnitEvent) -> UnitOutcome {
        let cache = self.config.enable_cache.then_some(&mut self.cache);
        let id = event.id.clone();
        let outcome = process_unit(cache, event);

        match &outcome {
            UnitOutcome::Recorded(record) => {
                if record.duration > self.config.slow_threshold_ms {
                    self.report.slow_modules.push(record.clone());
                }
                self.report.modules.push(record.clone());
                self.processed_count += 1;
            }
            UnitOutcome::Cached(first) => {
                debug!("Cached unit {} (first pass {:.0}ms)", id, first.duration)
            }
            UnitOutcome::Skipped => debug!("Skipped unit {}", id),
        }
        outcome
    }

    /// Build the dependency graph from the emitted artifacts
    pub fn set_artifacts<K, I>(&mut self, artifacts: I)
    where
        I: IntoIterator<Item = (K, ArtifactMeta)>,
    {
        self.report.dependency_graph = build_dependency_graph(artifacts);
        debug!(
            "Dependency graph built with {} artifacts",
            self.report.dependency_graph.len()
        );
    }

    /// Compute all derived fields and return the finalized report.
    pub fn finish(self, now: f64) -> BuildReport {
        let mut report = self.report;
        report.end_time = now;
        report.total_duration = report.end_time - report.start_time;
        report.module_count = report.modules.len();

        let module_stats = stats::aggregate(&report.modules, self.config.slow_threshold_ms);
        report.avg_module_size = module_stats.avg_size;
        report.max_duration_module = module_stats.max_duration_module;
        report.slow_modules = module_stats.slow_modules;

        report.optimization_tips = Advisor::default().advise(&report.modules);
        report.circular_dependencies = find_cycles(&report.dependency_graph);

        log_summary(&report, self.cache.hits());
        report
    }
}

fn log_summary(report: &BuildReport, cache_hits: usize) {
    info!("Total build time: {}", format_duration(report.total_duration));
    info!("Units processed: {} ({} cached)", report.module_count, cache_hits);
    info!("Slow units: {}", report.slow_modules.len());
    info!("Average unit size: {:.2}KB", report.avg_module_size / 1024.0);

    for (i, unit) in report.slowest(SUMMARY_SLOWEST).iter().enumerate() {
        info!("  {}. {} ({:.0}ms)", i + 1, unit.id, unit.duration);
    }
    for tip in &report.optimization_tips {
        info!("  {}", tip);
    }
    for cycle in &report.circular_dependencies {
        warn!("Circular dependency: {}", cycle.join(" -> "));
    }
}
