//! Data shapes shared by the aggregation engine and the report emitters

use buildscope_graph::DependencyNode;
use serde::{Deserialize, Serialize};

/// One measured build unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    /// Normalized, platform-independent identifier
    pub id: String,
    /// Processing time in milliseconds
    pub duration: f64,
    /// Byte length of the unit's content
    pub size: u64,
    pub start_time: f64,
    pub end_time: f64,
}

impl UnitRecord {
    /// Create a record from its measured start and end timestamps.
    pub fn new(id: impl Into<String>, size: u64, start_time: f64, end_time: f64) -> Self {
        Self {
            id: id.into(),
            duration: end_time - start_time,
            size,
            start_time,
            end_time,
        }
    }
}

/// A point-in-time estimate of build completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub processed_count: usize,
    pub total_modules: usize,
    pub elapsed_time: f64,
    pub avg_time_per_module: f64,
    /// Raw estimate; negative when more units were processed than discovered
    pub estimated_remaining: f64,
}

impl ProgressSnapshot {
    /// Completion percentage, 0 when nothing was discovered yet
    pub fn percent(&self) -> f64 {
        if self.total_modules == 0 {
            0.0
        } else {
            self.processed_count as f64 / self.total_modules as f64 * 100.0
        }
    }

    /// Remaining time clamped at zero, for display
    pub fn display_remaining(&self) -> f64 {
        self.estimated_remaining.max(0.0)
    }
}

/// Aggregate build report, finalized once at the end of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub start_time: f64,
    pub end_time: f64,
    pub total_duration: f64,
    /// Units in processing order
    pub modules: Vec<UnitRecord>,
    pub slow_modules: Vec<UnitRecord>,
    pub dependency_graph: Vec<DependencyNode>,
    pub module_count: usize,
    pub avg_module_size: f64,
    pub max_duration_module: Option<UnitRecord>,
    pub optimization_tips: Vec<String>,
    #[serde(default)]
    pub circular_dependencies: Vec<Vec<String>>,
}

impl BuildReport {
    /// Empty report for a build starting at `start_time`
    pub fn empty(start_time: f64) -> Self {
        Self {
            start_time,
            end_time: start_time,
            total_duration: 0.0,
            modules: Vec::new(),
            slow_modules: Vec::new(),
            dependency_graph: Vec::new(),
            module_count: 0,
            avg_module_size: 0.0,
            max_duration_module: None,
            optimization_tips: Vec::new(),
            circular_dependencies: Vec::new(),
        }
    }

    /// Whether the build took longer than `max_build_time_ms`
    pub fn exceeds_budget(&self, max_build_time_ms: f64) -> bool {
        self.total_duration > max_build_time_ms
    }

    /// The `n` slowest of the slow units, slowest first
    pub fn slowest(&self, n: usize) -> Vec<&UnitRecord> {
        let mut slow: Vec<_> = self.slow_modules.iter().collect();
        slow.sort_by(|a, b| b.duration.total_cmp(&a.duration));
        slow.truncate(n);
        slow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_timestamps() {
        let unit = UnitRecord::new("src/a.ts", 10, 100.0, 142.5);
        assert_eq!(unit.duration, 42.5);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut report = BuildReport::empty(1.0);
        report.modules.push(UnitRecord::new("a.js", 1, 1.0, 2.0));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"slowModules\""));
        assert!(json.contains("\"maxDurationModule\":null"));
        assert!(json.contains("\"startTime\":1.0"));
    }

    #[test]
    fn test_slowest_orders_by_duration() {
        let mut report = BuildReport::empty(0.0);
        report.slow_modules = vec![
            UnitRecord::new("a", 0, 0.0, 300.0),
            UnitRecord::new("b", 0, 0.0, 900.0),
            UnitRecord::new("c", 0, 0.0, 500.0),
        ];

        let ids: Vec<_> = report.slowest(2).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        // report order untouched
        assert_eq!(report.slow_modules[0].id, "a");
    }

    #[test]
    fn test_progress_display_clamps() {
        let snapshot = ProgressSnapshot {
            processed_count: 12,
            total_modules: 10,
            elapsed_time: 120.0,
            avg_time_per_module: 10.0,
            estimated_remaining: -20.0,
        };
        assert_eq!(snapshot.display_remaining(), 0.0);
        assert_eq!(snapshot.percent(), 120.0);
    }
}
