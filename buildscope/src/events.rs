//! Recorded build event streams
//!
//! A build host that cannot link against this crate records its events as
//! JSON lines, one object per line, tagged by `kind`:
//!
//! ```text
//! {"kind":"start","time":0}
//! {"kind":"discovered","time":3}
//! {"kind":"unit","id":"src/main.ts","size":812,"startTime":3,"endTime":9.5}
//! {"kind":"end","time":1200}
//! ```
//!
//! Artifacts are a separate JSON object mapping artifact keys to
//! [`ArtifactMeta`], kept in file order.

use crate::config::InsightConfig;
use crate::error::{Error, Result};
use crate::model::BuildReport;
use crate::session::{BuildSession, UnitEvent};
use buildscope_graph::ArtifactMeta;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BuildEvent {
    Start { time: f64 },
    Discovered { time: f64 },
    Unit(UnitEvent),
    End { time: f64 },
}

impl BuildEvent {
    /// Latest timestamp carried by the event
    fn time(&self) -> f64 {
        match self {
            Self::Start { time } | Self::Discovered { time } | Self::End { time } => *time,
            Self::Unit(unit) => unit.end_time,
        }
    }
}

/// Parse a JSON-lines event stream, ignoring blank lines.
pub fn parse_events(reader: impl BufRead) -> Result<Vec<BuildEvent>> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io("<event stream>", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line)
            .map_err(|source| Error::InvalidEvent { line: i + 1, source })?;
        events.push(event);
    }
    Ok(events)
}

pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<BuildEvent>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    parse_events(std::io::BufReader::new(file))
}

/// Load an artifact snapshot, preserving the key order of the file.
pub fn load_artifacts(path: impl AsRef<Path>) -> Result<Vec<(String, ArtifactMeta)>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_artifacts(&content)
}

pub fn parse_artifacts(content: &str) -> Result<Vec<(String, ArtifactMeta)>> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    map.into_iter()
        .map(|(key, value)| -> Result<(String, ArtifactMeta)> {
            Ok((key, serde_json::from_value(value)?))
        })
        .collect()
}

/// Drive a [`BuildSession`] through a recorded stream and finalize it.
///
/// The stream must begin with a `start` event. Without an `end` event the
/// build ends at the latest timestamp seen.
pub fn replay(
    config: InsightConfig,
    events: Vec<BuildEvent>,
    artifacts: Vec<(String, ArtifactMeta)>,
) -> Result<BuildReport> {
    let mut events = events.into_iter();
    let Some(BuildEvent::Start { time }) = events.next() else {
        return Err(Error::MissingStart);
    };

    let mut session = BuildSession::start(config, time);
    let mut last_seen = time;
    let mut end = None;

    for event in events {
        last_seen = last_seen.max(event.time());
        match event {
            BuildEvent::Discovered { time } => {
                let _ = session.unit_discovered(time);
            }
            BuildEvent::Unit(unit) => {
                let _ = session.record_unit(unit);
            }
            BuildEvent::End { time } => end = Some(time),
            BuildEvent::Start { .. } => warn!("Ignoring repeated start event"),
        }
    }

    session.set_artifacts(artifacts);
    Ok(session.finish(end.unwrap_or(last_seen)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = r#"{"kind":"start","time":100}
{"kind":"discovered","time":101}
{"kind":"unit","id":"src/main.ts","size":812,"startTime":101,"endTime":110.5}

{"kind":"discovered","time":111}
{"kind":"unit","id":"src/slow.ts","size":4000,"startTime":111,"endTime":520}
"#;

    #[test]
    fn test_parse_events() {
        let events = parse_events(STREAM.as_bytes()).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], BuildEvent::Start { time: 100.0 });
        match &events[2] {
            BuildEvent::Unit(unit) => {
                assert_eq!(unit.id, "src/main.ts");
                assert_eq!(unit.end_time, 110.5);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_events("{\"kind\":\"start\",\"time\":0}\n{\"kind\":\"bogus\"}\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEvent { line: 2, .. }));
    }

    #[test]
    fn test_replay_without_end_uses_last_timestamp() {
        let events = parse_events(STREAM.as_bytes()).unwrap();
        let report = replay(InsightConfig::default(), events, Vec::new()).unwrap();

        assert_eq!(report.start_time, 100.0);
        assert_eq!(report.end_time, 520.0);
        assert_eq!(report.module_count, 2);
        assert_eq!(report.slow_modules.len(), 1);
        assert_eq!(report.slow_modules[0].id, "src/slow.ts");
    }

    #[test]
    fn test_replay_requires_start() {
        let events = vec![BuildEvent::End { time: 1.0 }];
        let err = replay(InsightConfig::default(), events, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::MissingStart));
    }

    #[test]
    fn test_parse_artifacts_keeps_order() {
        let artifacts = parse_artifacts(
            r#"{
                "zeta": {"fileName": "assets/zeta.js", "code": "abc", "dependencies": ["assets/alpha.js"]},
                "alpha": {"fileName": "assets/alpha.js", "size": 42}
            }"#,
        )
        .unwrap();

        assert_eq!(artifacts[0].0, "zeta");
        assert_eq!(artifacts[0].1.content_length(), 3);
        assert_eq!(artifacts[1].1.file_name, "assets/alpha.js");
        assert_eq!(artifacts[1].1.content_length(), 42);
        assert!(artifacts[1].1.imports.is_none());
    }
}
