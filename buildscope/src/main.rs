//! Buildscope - build health reports for module-by-module build pipelines

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            events,
            artifacts,
            config,
            output_dir,
            slow_threshold,
            max_build_time,
            no_html,
            no_json,
        } => commands::analyze::execute(
            &events,
            artifacts.as_deref(),
            config.as_deref(),
            commands::analyze::Overrides {
                output_dir,
                slow_threshold,
                max_build_time,
                no_html,
                no_json,
            },
        ),
        Commands::Compare {
            previous,
            current,
            json,
        } => commands::compare::execute(&previous, &current, json),
        Commands::Cycles { artifacts } => commands::cycles::execute(&artifacts),
    }
}
