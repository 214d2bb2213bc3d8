//! Report generation (JSON, HTML, dependency graph)

use crate::config::InsightConfig;
use crate::error::{Error, Result};
use crate::format::{format_duration, format_file_size};
use crate::model::{BuildReport, UnitRecord};
use buildscope_graph::DependencyNode;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const JSON_REPORT_FILE: &str = "build-report.json";
pub const HTML_REPORT_FILE: &str = "build-report.html";
pub const DEPENDENCY_REPORT_FILE: &str = "dependencies.json";

/// JSON document shape: the report plus generation metadata
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a BuildReport,
    generated_at: String,
    version: &'static str,
}

pub fn to_json(report: &BuildReport) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        report,
        generated_at: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn dependencies_to_json(graph: &[DependencyNode]) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(graph)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unit_rows(units: &[UnitRecord]) -> String {
    units
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                escape_html(&u.id),
                u.duration,
                format_file_size(u.size)
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn list_items(items: impl Iterator<Item = String>) -> String {
    items
        .map(|item| format!("<li>{}</li>", escape_html(&item)))
        .collect::<Vec<_>>()
        .join("\n        ")
}

pub fn to_html(report: &BuildReport) -> String {
    let slowest = report
        .max_duration_module
        .as_ref()
        .map_or_else(|| "-".to_string(), |u| format!("{} ({:.0}ms)", u.id, u.duration));

    format!(r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Build Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h1 {{ color: #333; }}
        .stats {{ background: #f4f4f4; padding: 15px; border-radius: 5px; }}
        .warn {{ color: #b35900; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #667eea; color: white; }}
    </style>
</head>
<body>
    <h1>Build Report</h1>
    <div class="stats">
        <p>Total Duration: {}</p>
        <p>Units: {}</p>
        <p>Slow Units: {}</p>
        <p>Average Unit Size: {}</p>
        <p>Slowest Unit: {}</p>
    </div>
    <h2>Optimization Tips</h2>
    <ul>
        {}
    </ul>
    <h2 class="warn">Circular Dependencies</h2>
    <ul>
        {}
    </ul>
    <h2>Slow Units</h2>
    <table>
        <tr><th>Unit</th><th>Duration (ms)</th><th>Size</th></tr>
        {}
    </table>
    <h2>All Units</h2>
    <table>
        <tr><th>Unit</th><th>Duration (ms)</th><th>Size</th></tr>
        {}
    </table>
</body>
</html>"#,
        format_duration(report.total_duration),
        report.module_count,
        report.slow_modules.len(),
        format_file_size(report.avg_module_size.round() as u64),
        escape_html(&slowest),
        list_items(report.optimization_tips.iter().cloned()),
        list_items(report.circular_dependencies.iter().map(|c| c.join(" → "))),
        unit_rows(&report.slow_modules),
        unit_rows(&report.modules),
    )
}

/// Writes report documents into an output directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    generate_json: bool,
    generate_html: bool,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            generate_json: true,
            generate_html: true,
        }
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            generate_json: config.generate_json,
            generate_html: config.generate_html,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every enabled document; returns the paths written.
    pub fn write_all(&self, report: &BuildReport) -> Result<Vec<PathBuf>> {
        let mut written = vec![self.write_dependencies(&report.dependency_graph)?];
        if self.generate_json {
            written.push(self.write_json(report)?);
        }
        if self.generate_html {
            written.push(self.write_html(report)?);
        }
        Ok(written)
    }

    pub fn write_json(&self, report: &BuildReport) -> Result<PathBuf> {
        self.write(JSON_REPORT_FILE, &to_json(report)?)
    }

    pub fn write_html(&self, report: &BuildReport) -> Result<PathBuf> {
        self.write(HTML_REPORT_FILE, &to_html(report))
    }

    pub fn write_dependencies(&self, graph: &[DependencyNode]) -> Result<PathBuf> {
        self.write(DEPENDENCY_REPORT_FILE, &dependencies_to_json(graph)?)
    }

    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        info!("Report written: {}", path.display());
        Ok(path)
    }
}

/// Load a previously written JSON report
pub fn load_report(path: impl AsRef<Path>) -> Result<BuildReport> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BuildReport {
        let mut report = BuildReport::empty(0.0);
        report.end_time = 10_500.0;
        report.total_duration = 10_500.0;
        report.modules = vec![
            UnitRecord::new("src/<App>.vue", 2048, 0.0, 350.0),
            UnitRecord::new("src/main.ts", 1024, 0.0, 20.0),
        ];
        report.slow_modules = vec![report.modules[0].clone()];
        report.module_count = 2;
        report.avg_module_size = 1536.0;
        report.max_duration_module = Some(report.modules[0].clone());
        report.optimization_tips = vec!["💡 split things".to_string()];
        report.circular_dependencies = vec![vec!["a.js".to_string(), "b.js".to_string()]];
        report.dependency_graph = vec![DependencyNode {
            file: "a.js".to_string(),
            imports: vec![],
            size: 3,
            dependencies: vec!["b.js".to_string()],
        }];
        report
    }

    #[test]
    fn test_json_generation() {
        let json = to_json(&sample_report()).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"moduleCount\": 2"));
        assert!(json.contains("\"circularDependencies\""));
        assert!(json.contains(&format!("\"version\": \"{}\"", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_html_generation() {
        let html = to_html(&sample_report());
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("10.5s"));
        assert!(html.contains("1.5 KB"));
        assert!(html.contains("src/&lt;App&gt;.vue"));
        assert!(html.contains("a.js → b.js"));
        assert!(html.contains("<td>350.00</td>"));
    }

    #[test]
    fn test_writer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("nested/out"));
        let report = sample_report();

        let written = writer.write_all(&report).unwrap();
        assert_eq!(written.len(), 3);
        for path in &written {
            assert!(path.exists());
        }

        let loaded = load_report(writer.output_dir().join(JSON_REPORT_FILE)).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn test_writer_honors_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = InsightConfig {
            output_dir: dir.path().to_path_buf(),
            generate_html: false,
            generate_json: false,
            ..InsightConfig::default()
        };

        let written = ReportWriter::from_config(&config).write_all(&sample_report()).unwrap();
        assert_eq!(written, vec![dir.path().join(DEPENDENCY_REPORT_FILE)]);
        assert!(!dir.path().join(HTML_REPORT_FILE).exists());
    }
}
