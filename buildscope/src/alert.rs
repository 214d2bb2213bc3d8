//! Build-time budget alerts delivered to a CI webhook

use crate::config::InsightConfig;
use crate::error::{Error, Result};
use crate::model::BuildReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook payload for a build over its time budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAlert {
    pub msg: String,
    pub build_time: f64,
    pub threshold: f64,
    /// Number of slow units in the build
    pub slow_modules: usize,
    /// RFC 3339
    pub timestamp: String,
}

impl BuildAlert {
    /// Alert for `report` when it exceeds `threshold_ms`, `None` otherwise.
    pub fn from_report(report: &BuildReport, threshold_ms: f64) -> Option<Self> {
        if !report.exceeds_budget(threshold_ms) {
            return None;
        }

        Some(Self {
            msg: format!(
                "Build time exceeded: {:.0}ms > {:.0}ms",
                report.total_duration, threshold_ms
            ),
            build_time: report.total_duration,
            threshold: threshold_ms,
            slow_modules: report.slow_modules.len(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Posts alerts as JSON to a fixed URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    headers: BTreeMap<String, String>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, headers: BTreeMap<String, String>) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }

    /// Notifier for the configured webhook, if any
    pub fn from_config(config: &InsightConfig) -> Option<Self> {
        config
            .webhook_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.webhook_headers.clone()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn send(&self, alert: &BuildAlert) -> Result<()> {
        let mut request = ureq::post(&self.url)
            .timeout(WEBHOOK_TIMEOUT)
            .set("Content-Type", "application/json");
        for (name, value) in &self.headers {
            request = request.set(name, value);
        }

        match request.send_json(alert) {
            Ok(_) => {
                info!("Build alert delivered to {}", self.url);
                Ok(())
            }
            Err(e) => {
                error!("Webhook alert failed: {}", e);
                Err(Error::Webhook {
                    url: self.url.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}
