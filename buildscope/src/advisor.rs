//! Heuristic optimization findings
//!
//! The advisor runs an ordered list of independent rules over the same set
//! of units. Each rule yields at most one finding, and findings come out in
//! rule order. New rules are appended with [`Advisor::with_rule`].

use crate::format::normalize_path;
use crate::model::UnitRecord;

/// Path segment marking third-party dependencies
pub const THIRD_PARTY_MARKER: &str = "node_modules";
/// Third-party units slower than this are reported
pub const THIRD_PARTY_SLOW_MS: f64 = 100.0;
/// Units larger than this are reported as large files
pub const LARGE_FILE_BYTES: u64 = 100_000;
/// Units slower than this are reported as very slow
pub const VERY_SLOW_MS: f64 = 1000.0;
/// Worst offenders named per finding
const MAX_EXAMPLES: usize = 3;

/// A single heuristic over unit records.
pub trait AdvisorRule {
    /// Produce a finding, or `None` when the rule does not fire.
    fn evaluate(&self, units: &[UnitRecord]) -> Option<String>;
}

/// Third-party units slower than [`THIRD_PARTY_SLOW_MS`]
pub struct SlowThirdPartyRule;

impl AdvisorRule for SlowThirdPartyRule {
    fn evaluate(&self, units: &[UnitRecord]) -> Option<String> {
        let mut slow: Vec<_> = units
            .iter()
            .filter(|u| u.id.contains(THIRD_PARTY_MARKER) && u.duration > THIRD_PARTY_SLOW_MS)
            .collect();
        if slow.is_empty() {
            return None;
        }
        slow.sort_by(|a, b| b.duration.total_cmp(&a.duration));

        let examples = worst(&slow, |u| package_segment(&u.id));
        Some(format!(
            "🚨 Found {} slow third-party libraries, e.g.: {}. Check their versions or look for alternatives.",
            slow.len(),
            examples
        ))
    }
}

/// Units larger than [`LARGE_FILE_BYTES`]
pub struct LargeFileRule;

impl AdvisorRule for LargeFileRule {
    fn evaluate(&self, units: &[UnitRecord]) -> Option<String> {
        let mut large: Vec<_> = units.iter().filter(|u| u.size > LARGE_FILE_BYTES).collect();
        if large.is_empty() {
            return None;
        }
        large.sort_by(|a, b| b.size.cmp(&a.size));

        let examples = worst(&large, |u| normalize_path(&u.id));
        Some(format!(
            "💡 Found {} files larger than 100KB, e.g.: {}. Consider code splitting.",
            large.len(),
            examples
        ))
    }
}

/// Units slower than [`VERY_SLOW_MS`]
pub struct VerySlowRule;

impl AdvisorRule for VerySlowRule {
    fn evaluate(&self, units: &[UnitRecord]) -> Option<String> {
        let mut very_slow: Vec<_> = units.iter().filter(|u| u.duration > VERY_SLOW_MS).collect();
        if very_slow.is_empty() {
            return None;
        }
        very_slow.sort_by(|a, b| b.duration.total_cmp(&a.duration));

        let examples = worst(&very_slow, |u| normalize_path(&u.id));
        Some(format!(
            "⚠️ Found {} modules taking over 1s to process, e.g.: {}. Optimize these first.",
            very_slow.len(),
            examples
        ))
    }
}

fn worst(sorted: &[&UnitRecord], label: impl Fn(&UnitRecord) -> String) -> String {
    sorted
        .iter()
        .take(MAX_EXAMPLES)
        .map(|&u| label(u))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The part of `id` after its first `/node_modules/` segment
fn package_segment(id: &str) -> String {
    let normalized = normalize_path(id);
    let marker = format!("/{THIRD_PARTY_MARKER}/");
    match normalized.split(marker.as_str()).nth(1) {
        Some(segment) => segment.to_string(),
        None => normalized,
    }
}

/// Ordered set of rules
pub struct Advisor {
    rules: Vec<Box<dyn AdvisorRule>>,
}

impl Default for Advisor {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(SlowThirdPartyRule),
                Box::new(LargeFileRule),
                Box::new(VerySlowRule),
            ],
        }
    }
}

impl Advisor {
    /// Advisor without any rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; its finding is emitted after all existing ones.
    pub fn with_rule(mut self, rule: impl AdvisorRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Run every rule in order, keeping one message per rule that fires.
    pub fn advise(&self, units: &[UnitRecord]) -> Vec<String> {
        self.rules.iter().filter_map(|r| r.evaluate(units)).collect()
    }
}

/// Run the default rules over `units`.
pub fn advise(units: &[UnitRecord]) -> Vec<String> {
    Advisor::default().advise(units)
}
