//! End-to-end build session test
//!
//! Replays a recorded build the way a bundler host would emit it:
//! 1. Units are discovered and processed, with progress estimates
//! 2. Third-party and virtual units are filtered, repeated units are cached
//! 3. The artifact snapshot is turned into a dependency graph
//! 4. The finalized report is written and read back

use buildscope::events::{BuildEvent, parse_artifacts, parse_events};
use buildscope::reports::{DEPENDENCY_REPORT_FILE, HTML_REPORT_FILE, JSON_REPORT_FILE, load_report};
use buildscope::*;

fn unit(id: &str, size: u64, start: f64, end: f64) -> BuildEvent {
    BuildEvent::Unit(UnitEvent {
        id: id.to_string(),
        size,
        start_time: start,
        end_time: end,
    })
}

/// A build of `n` small units plus a few interesting ones
fn recorded_build(n: usize) -> Vec<BuildEvent> {
    let mut events = vec![BuildEvent::Start { time: 0.0 }];
    let mut clock = 0.0;

    for i in 0..n {
        events.push(BuildEvent::Discovered { time: clock });
        events.push(unit(&format!("/app/src/part{i}.ts"), 1000, clock, clock + 10.0));
        clock += 10.0;
    }

    events.push(BuildEvent::Discovered { time: clock });
    events.push(unit("/app/src/huge.ts", 250_000, clock, clock + 1500.0));
    clock += 1500.0;
    events.push(unit("/app/node_modules/lodash/lodash.js", 50_000, clock, clock + 400.0));
    events.push(unit("/app/node_modules/ui/theme.css", 2_000, clock, clock + 150.0));
    events.push(unit("virtual:pwa-register", 10, clock, clock + 1.0));
    // repeated transform of an already measured unit
    events.push(unit("/app/src/part0.ts", 1000, clock, clock + 999.0));
    clock += 400.0;
    events.push(BuildEvent::End { time: clock });
    events
}

#[test]
fn test_full_build_report() {
    let artifacts = parse_artifacts(
        r#"{
            "index": {"fileName": "assets/index.js", "imports": ["assets/vendor.js"], "dependencies": ["assets/vendor.js"], "code": "console.log(1)"},
            "vendor": {"fileName": "assets/vendor.js", "dependencies": ["assets/index.js"]},
            "style": {"fileName": "assets/style.css", "size": 2048}
        }"#,
    )
    .unwrap();

    let report = replay(InsightConfig::default(), recorded_build(12), artifacts).unwrap();

    // 12 parts + huge + third-party stylesheet; lodash, virtual and repeat are not measured
    assert_eq!(report.module_count, 14);
    assert_eq!(report.modules.len(), 14);
    assert_eq!(report.total_duration, 120.0 + 1500.0 + 400.0);

    let max = report.max_duration_module.as_ref().unwrap();
    assert_eq!(max.id, "/app/src/huge.ts");

    let slow: Vec<_> = report.slow_modules.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(slow, vec!["/app/src/huge.ts"]);

    let expected_avg = (12.0 * 1000.0 + 250_000.0 + 2_000.0) / 14.0;
    assert!((report.avg_module_size - expected_avg).abs() < 1e-9);

    // third-party css at 150ms, large file, very slow file
    assert_eq!(report.optimization_tips.len(), 3);
    assert!(report.optimization_tips[0].contains("ui/theme.css"));
    assert!(report.optimization_tips[1].contains("/app/src/huge.ts"));
    assert!(report.optimization_tips[2].contains("/app/src/huge.ts"));

    assert_eq!(report.dependency_graph.len(), 3);
    assert_eq!(report.dependency_graph[0].size, 14);
    assert_eq!(report.dependency_graph[2].size, 2048);
    assert_eq!(
        report.circular_dependencies,
        vec![vec!["assets/index.js".to_string(), "assets/vendor.js".to_string()]]
    );
}

#[test]
fn test_reports_written_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let config = InsightConfig {
        output_dir: dir.path().to_path_buf(),
        ..InsightConfig::default()
    };

    let report = replay(config.clone(), recorded_build(3), Vec::new()).unwrap();
    let written = ReportWriter::from_config(&config).write_all(&report).unwrap();
    assert_eq!(written.len(), 3);

    for file in [JSON_REPORT_FILE, HTML_REPORT_FILE, DEPENDENCY_REPORT_FILE] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    let reloaded = load_report(dir.path().join(JSON_REPORT_FILE)).unwrap();
    assert_eq!(reloaded, report);

    let comparison = compare_reports(&reloaded, &report);
    assert_eq!(comparison.duration_change, "+0.0%");
    assert_eq!(comparison.performance_trend, PerformanceTrend::Stable);
}

#[test]
fn test_build_over_budget_produces_alert() {
    let config = InsightConfig {
        max_build_time_ms: Some(1000.0),
        ..InsightConfig::default()
    };

    let report = replay(config.clone(), recorded_build(2), Vec::new()).unwrap();
    let alert = BuildAlert::from_report(&report, config.max_build_time_ms.unwrap()).unwrap();
    assert_eq!(alert.build_time, report.total_duration);
    assert_eq!(alert.slow_modules, 1);
}

#[test]
fn test_progress_estimates_during_session() {
    let mut session = BuildSession::start(InsightConfig::default(), 0.0);
    let mut snapshots = Vec::new();

    for i in 0..20u32 {
        let t = f64::from(i) * 10.0;
        if let Some(snapshot) = session.unit_discovered(t) {
            snapshots.push(snapshot);
        }
        let _ = session.record_unit(UnitEvent {
            id: format!("src/m{i}.ts"),
            size: 1,
            start_time: t,
            end_time: t + 10.0,
        });
    }

    // estimates start once ten units were processed
    assert_eq!(snapshots.len(), 10);
    assert_eq!(snapshots[0].processed_count, 10);
    assert_eq!(snapshots[0].total_modules, 11);
    assert_eq!(snapshots[0].elapsed_time, 100.0);
    assert_eq!(snapshots[0].estimated_remaining, 10.0);
}

#[test]
fn test_event_stream_parsing_matches_replay() {
    let stream = "{\"kind\":\"start\",\"time\":0}\n\
                  {\"kind\":\"unit\",\"id\":\"a.js\",\"size\":1000,\"startTime\":0,\"endTime\":50}\n\
                  {\"kind\":\"unit\",\"id\":\"b.js\",\"size\":2000,\"startTime\":50,\"endTime\":350}\n\
                  {\"kind\":\"unit\",\"id\":\"c.js\",\"size\":3000,\"startTime\":350,\"endTime\":440}\n\
                  {\"kind\":\"end\",\"time\":500}\n";

    let events = parse_events(stream.as_bytes()).unwrap();
    let report = replay(InsightConfig::default(), events, Vec::new()).unwrap();

    assert_eq!(report.avg_module_size, 2000.0);
    assert_eq!(report.max_duration_module.unwrap().id, "b.js");
    assert_eq!(report.slow_modules.len(), 1);
    assert_eq!(report.slow_modules[0].id, "b.js");
    assert!(report.optimization_tips.is_empty());
}
