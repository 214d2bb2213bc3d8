//! Completion estimate from a partial unit stream

use crate::model::ProgressSnapshot;

/// Units processed before estimates are produced
pub const DEFAULT_SKIP_FIRST_N: usize = 10;

/// Estimate remaining build time.
///
/// Returns `None` while fewer than `skip_first_n` units were processed, since
/// early averages swing too much to be useful, and whenever nothing was
/// processed at all.
pub fn estimate(
    processed_count: usize,
    total_modules: usize,
    start_time: f64,
    now: f64,
    skip_first_n: usize,
) -> Option<ProgressSnapshot> {
    if processed_count < skip_first_n || processed_count == 0 {
        return None;
    }

    let elapsed_time = now - start_time;
    let avg_time_per_module = elapsed_time / processed_count as f64;
    let estimated_remaining = (total_modules as f64 - processed_count as f64) * avg_time_per_module;

    Some(ProgressSnapshot {
        processed_count,
        total_modules,
        elapsed_time,
        avg_time_per_module,
        estimated_remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressed_below_skip() {
        for processed in 0..DEFAULT_SKIP_FIRST_N {
            assert!(estimate(processed, 100, 0.0, 1000.0, DEFAULT_SKIP_FIRST_N).is_none());
        }
    }

    #[test]
    fn test_estimate_at_skip() {
        let snapshot = estimate(10, 40, 1000.0, 3000.0, DEFAULT_SKIP_FIRST_N).unwrap();
        assert_eq!(snapshot.elapsed_time, 2000.0);
        assert_eq!(snapshot.avg_time_per_module, 200.0);
        assert_eq!(snapshot.estimated_remaining, 30.0 * 200.0);
        assert_eq!(snapshot.percent(), 25.0);
    }

    #[test]
    fn test_formula_is_exact() {
        let (processed, total, elapsed) = (17usize, 53usize, 1234.567);
        let snapshot = estimate(processed, total, 0.0, elapsed, 10).unwrap();
        let expected = (total as f64 - processed as f64) * (elapsed / processed as f64);
        assert_eq!(snapshot.estimated_remaining, expected);
    }

    #[test]
    fn test_negative_remaining_when_total_exceeded() {
        let snapshot = estimate(12, 10, 0.0, 120.0, 10).unwrap();
        assert_eq!(snapshot.estimated_remaining, -20.0);
    }

    #[test]
    fn test_zero_skip_guards_zero_processed() {
        assert!(estimate(0, 5, 0.0, 10.0, 0).is_none());
        assert!(estimate(1, 5, 0.0, 10.0, 0).is_some());
    }
}
