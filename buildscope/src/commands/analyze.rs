//! Analyze - replay a recorded build through a session and emit reports

use buildscope::events::{load_artifacts, load_events};
use buildscope::{BuildAlert, InsightConfig, ReportWriter, WebhookNotifier, replay};
use std::path::{Path, PathBuf};

/// Command-line overrides applied on top of the configuration file
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub slow_threshold: Option<f64>,
    pub max_build_time: Option<f64>,
    pub no_html: bool,
    pub no_json: bool,
}

impl Overrides {
    fn apply(self, config: &mut InsightConfig) {
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(threshold) = self.slow_threshold {
            config.slow_threshold_ms = threshold;
        }
        if self.max_build_time.is_some() {
            config.max_build_time_ms = self.max_build_time;
        }
        config.generate_html &= !self.no_html;
        config.generate_json &= !self.no_json;
    }
}

pub fn execute(
    events: &Path,
    artifacts: Option<&Path>,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            InsightConfig::load(path)?
        }
        None => InsightConfig::default(),
    };
    overrides.apply(&mut config);

    let events = load_events(events)?;
    let artifacts = match artifacts {
        Some(path) => load_artifacts(path)?,
        None => Vec::new(),
    };
    tracing::debug!("Replaying {} events, {} artifacts", events.len(), artifacts.len());

    let report = replay(config.clone(), events, artifacts)?;

    let written = ReportWriter::from_config(&config).write_all(&report)?;

    println!();
    println!("📊 Build report summary");
    println!("  ⏱️  Total build time: {:.2}s", report.total_duration / 1000.0);
    println!("  📦 Units processed:  {}", report.module_count);
    println!("  🐌 Slow units:       {}", report.slow_modules.len());
    println!("  📏 Avg unit size:    {:.2}KB", report.avg_module_size / 1024.0);
    if !report.circular_dependencies.is_empty() {
        println!("  🔁 Cycles:           {}", report.circular_dependencies.len());
    }
    for tip in &report.optimization_tips {
        println!("  {}", tip);
    }
    println!();
    for path in &written {
        println!("  ✓ {}", path.display());
    }

    if let Some(max) = config.max_build_time_ms {
        if let Some(alert) = BuildAlert::from_report(&report, max) {
            tracing::warn!("{}", alert.msg);
            if let Some(notifier) = WebhookNotifier::from_config(&config) {
                // Delivery failure is already logged and must not fail the build
                let _ = notifier.send(&alert);
            }
        }
    }

    Ok(())
}
