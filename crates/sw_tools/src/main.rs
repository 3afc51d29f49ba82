//! Superweapon core - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sw-tools")]
#[command(about = "Development tools for the superweapon core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the rules and scenarios in a data directory
    Validate {
        /// Path to data directory
        #[arg(default_value = "data")]
        path: PathBuf,
    },
    /// Run a scenario headlessly and print a JSON report
    Run {
        /// Scenario file
        scenario: PathBuf,
        /// Rules file
        #[arg(long, default_value = "data/rules.ron")]
        rules: PathBuf,
        /// Frames to simulate instead of the scenario's own length
        #[arg(long)]
        frames: Option<u64>,
        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
}

fn run(
    rules: &Path,
    scenario: &Path,
    frames: Option<u64>,
    pretty: bool,
) -> sw_tools::error::ToolResult<String> {
    let rules = sw_tools::validate::load_rules(rules)?;
    let scenario = sw_tools::validate::load_scenario(scenario)?;
    let report = sw_tools::report::run_scenario(rules, &scenario, frames)?;
    sw_tools::report::to_json(&report, pretty)
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            match sw_tools::validate::validate_data_directory(&path) {
                Ok(summary) => {
                    tracing::info!(scenarios = summary.scenarios.len(), "Validation passed");
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Run {
            scenario,
            rules,
            frames,
            pretty,
        } => match run(&rules, &scenario, frames, pretty) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Run failed: {e}");
                std::process::exit(1);
            }
        },
    }
}
