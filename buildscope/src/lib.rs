//! Buildscope - build health reports for module-by-module build pipelines
//!
//! Buildscope collects per-unit timing and size telemetry while a bundler
//! processes source units, and turns it into a report describing build
//! health:
//! - **Statistics**: average unit size, slowest unit, slow-unit set
//! - **Advice**: heuristic findings for slow third-party code, large files
//!   and very slow units
//! - **Progress**: remaining-time estimates from a partial unit stream
//! - **Dependencies**: artifact graph and circular dependency detection
//!   (using buildscope-graph)
//!
//! ## Usage
//!
//! ```
//! use buildscope::*;
//!
//! let mut session = BuildSession::start(InsightConfig::default(), 0.0);
//! let _ = session.record_unit(UnitEvent {
//!     id: "src/main.ts".to_string(),
//!     size: 2048,
//!     start_time: 1.0,
//!     end_time: 250.0,
//! });
//! session.set_artifacts(vec![("main", ArtifactMeta::new("assets/main.js"))]);
//!
//! let report = session.finish(400.0);
//! assert_eq!(report.slow_modules.len(), 1);
//! assert!(report.circular_dependencies.is_empty());
//! ```

pub mod advisor;
pub mod alert;
pub mod compare;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod model;
pub mod progress;
pub mod reports;
pub mod session;
pub mod stats;

pub use advisor::{Advisor, AdvisorRule, advise};
pub use alert::{BuildAlert, WebhookNotifier};
pub use compare::{PerformanceTrend, ReportComparison, compare_reports};
pub use config::InsightConfig;
pub use error::{Error, Result};
pub use events::{BuildEvent, replay};
pub use model::{BuildReport, ProgressSnapshot, UnitRecord};
pub use progress::estimate;
pub use reports::ReportWriter;
pub use session::{BuildSession, UnitCache, UnitEvent, UnitOutcome};
pub use stats::{ModuleStats, aggregate};

// Re-export graph library
pub use buildscope_graph::{
    ArtifactMeta, DependencyGraph, DependencyNode, build_dependency_graph, find_cycles,
};
