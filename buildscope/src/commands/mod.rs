//! Buildscope command-line interface
//!
//! - `analyze`: Replay a recorded build and write its reports
//! - `compare`: Compare two JSON reports
//! - `cycles`: Find circular dependencies in an artifact snapshot

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod analyze;
pub mod compare;
pub mod cycles;

/// Buildscope - build health reports for module-by-module builds
#[derive(Parser)]
#[command(name = "buildscope")]
#[command(about = "Build telemetry reports with slow-unit analysis and cycle detection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded event stream and write build reports
    Analyze {
        /// JSON-lines event stream
        #[arg(short, long)]
        events: PathBuf,

        /// JSON artifact snapshot for the dependency graph
        #[arg(short, long)]
        artifacts: Option<PathBuf>,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Slow-unit threshold in milliseconds
        #[arg(long)]
        slow_threshold: Option<f64>,

        /// Build time budget in milliseconds
        #[arg(long)]
        max_build_time: Option<f64>,

        /// Skip the HTML report
        #[arg(long)]
        no_html: bool,

        /// Skip the JSON report
        #[arg(long)]
        no_json: bool,
    },

    /// Compare two JSON build reports
    Compare {
        /// Report of the earlier build
        previous: PathBuf,

        /// Report of the later build
        current: PathBuf,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find circular dependencies in an artifact snapshot
    Cycles {
        /// JSON artifact snapshot
        artifacts: PathBuf,
    },
}
