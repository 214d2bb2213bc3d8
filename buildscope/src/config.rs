//! Buildscope configuration
//!
//! Loaded once at startup from an optional YAML file, then adjusted by
//! command-line flags:
//!
//! ```yaml
//! slowThresholdMs: 150
//! maxBuildTimeMs: 60000
//! outputDir: target/reports
//! webhookUrl: https://ci.example.com/hooks/build
//! webhookHeaders:
//!   Authorization: Bearer token
//! ```

use crate::error::{Error, Result};
use crate::progress::DEFAULT_SKIP_FIRST_N;
use crate::stats::DEFAULT_SLOW_THRESHOLD_MS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsightConfig {
    /// Units slower than this are slow units
    pub slow_threshold_ms: f64,
    /// Units processed before progress is estimated
    pub progress_skip_first_n: usize,
    /// Wall-clock budget for the whole build
    pub max_build_time_ms: Option<f64>,
    pub output_dir: PathBuf,
    pub generate_html: bool,
    pub generate_json: bool,
    pub enable_progress: bool,
    /// Skip re-measuring a unit id already seen in this build
    pub enable_cache: bool,
    /// Alert endpoint for builds over budget
    pub webhook_url: Option<String>,
    pub webhook_headers: BTreeMap<String, String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: DEFAULT_SLOW_THRESHOLD_MS,
            progress_skip_first_n: DEFAULT_SKIP_FIRST_N,
            max_build_time_ms: None,
            output_dir: PathBuf::from("dist"),
            generate_html: true,
            generate_json: true,
            enable_progress: true,
            enable_cache: true,
            webhook_url: None,
            webhook_headers: BTreeMap::new(),
        }
    }
}

impl InsightConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
