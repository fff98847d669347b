use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use quaggasim::{config_loader, orchestrator};

/// Grid topology and Quagga configuration generator for routing simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the per-node configuration files and manifests
    #[arg(short, long, default_value = "quagga_output")]
    output: PathBuf,

    /// Build and check the scenario without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting quaggasim");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let config = config_loader::load_config(&args.config)?;

    if args.dry_run {
        let scenario = orchestrator::build_scenario(&config)?;
        let summary = scenario.summary();
        info!(
            "Dry run: {}x{} grid, {} areas, {} intra / {} inter / {} border links, {} protocol records",
            summary.rows,
            summary.cols,
            summary.areas,
            summary.edges.intra,
            summary.edges.inter,
            summary.edges.border,
            summary.records
        );
        return Ok(());
    }

    // Clean up the previous run
    if args.output.exists() && args.output != Path::new(".") {
        warn!("Removing previous output directory {:?}", args.output);
        fs::remove_dir_all(&args.output)
            .wrap_err_with(|| format!("Failed to remove output directory '{}'", args.output.display()))?;
    }
    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output.display()))?;

    let summary = orchestrator::generate_scenario(&config, &args.output)?;

    info!(
        "Configured {} daemons on {} nodes ({} files written)",
        summary.daemons, summary.nodes, summary.files_written
    );
    info!("Scenario generation completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&["quaggasim", "--config", "scenario.yaml"]);

        assert_eq!(args.config, PathBuf::from("scenario.yaml"));
        assert_eq!(args.output, PathBuf::from("quagga_output"));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_dry_run_args() {
        let args = Args::parse_from(&["quaggasim", "-c", "scenario.yaml", "-o", "out", "--dry-run"]);

        assert!(args.dry_run);
        assert_eq!(args.output, PathBuf::from("out"));
    }

    #[test]
    fn test_config_is_required() {
        assert!(Args::try_parse_from(&["quaggasim"]).is_err());
    }
}
