//! Statistics over a collection of unit records

use crate::model::UnitRecord;

/// Legacy slow-unit threshold for callers without an explicit one
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 200.0;

/// Derived statistics for a set of units
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleStats {
    pub avg_size: f64,
    /// First unit with the greatest duration, `None` for no units
    pub max_duration_module: Option<UnitRecord>,
    /// Units over the threshold, in input order
    pub slow_modules: Vec<UnitRecord>,
}

/// Fold `units` into average size, slowest unit and slow-unit subset.
pub fn aggregate(units: &[UnitRecord], slow_threshold_ms: f64) -> ModuleStats {
    let Some(first) = units.first() else {
        return ModuleStats {
            avg_size: 0.0,
            max_duration_module: None,
            slow_modules: Vec::new(),
        };
    };

    let total_size: f64 = units.iter().map(|u| u.size as f64).sum();
    let avg_size = total_size / units.len() as f64;

    let max = units
        .iter()
        .fold(first, |max, u| if u.duration > max.duration { u } else { max });

    let slow_modules = units
        .iter()
        .filter(|u| u.duration > slow_threshold_ms)
        .cloned()
        .collect();

    ModuleStats {
        avg_size,
        max_duration_module: Some(max.clone()),
        slow_modules,
    }
}
