//! Comparison of two finalized build reports

use crate::model::{BuildReport, UnitRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Relative duration change (percent) treated as noise
pub const STABLE_BAND_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTrend {
    Improved,
    Degraded,
    Stable,
}

impl fmt::Display for PerformanceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceTrend::Improved => write!(f, "📉 improved"),
            PerformanceTrend::Degraded => write!(f, "📈 degraded"),
            PerformanceTrend::Stable => write!(f, "➖ stable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportComparison {
    /// Signed percent change of total duration, e.g. `+12.5%`
    pub duration_change: String,
    /// Slow in the current build, not in the previous one
    pub new_slow_modules: Vec<UnitRecord>,
    /// Slow in the previous build, not any more
    pub removed_slow_modules: Vec<UnitRecord>,
    pub performance_trend: PerformanceTrend,
}

/// Compare `current` against `previous`.
///
/// A previous duration of zero yields `+0.0%` and a stable trend.
pub fn compare_reports(previous: &BuildReport, current: &BuildReport) -> ReportComparison {
    let change = if previous.total_duration > 0.0 {
        (current.total_duration - previous.total_duration) / previous.total_duration * 100.0
    } else {
        0.0
    };

    let performance_trend = if change < -STABLE_BAND_PERCENT {
        PerformanceTrend::Improved
    } else if change > STABLE_BAND_PERCENT {
        PerformanceTrend::Degraded
    } else {
        PerformanceTrend::Stable
    };

    ReportComparison {
        duration_change: format!("{change:+.1}%"),
        new_slow_modules: slow_difference(&current.slow_modules, &previous.slow_modules),
        removed_slow_modules: slow_difference(&previous.slow_modules, &current.slow_modules),
        performance_trend,
    }
}

/// Units in `from` whose id is absent from `other`, in `from` order
fn slow_difference(from: &[UnitRecord], other: &[UnitRecord]) -> Vec<UnitRecord> {
    let known: HashSet<&str> = other.iter().map(|u| u.id.as_str()).collect();
    from.iter()
        .filter(|u| !known.contains(u.id.as_str()))
        .cloned()
        .collect()
}
