use anyhow::{Context, Result};
use clap::Parser;
use school_capacities::{logging, Config, Pipeline};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "school_capacities")]
#[command(about = "Generate capacities.json from the school capacity CSV exports")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV inputs (defaults to data/ next to the program)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output JSON path (defaults to public/capacities.json next to the program)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let _log_guard = logging::init_logging(config.log_dir.as_deref());

    let summary = match Pipeline::run(&config) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Capacity pipeline failed: {}", e);
            return Err(e).context("Failed to generate capacities json");
        }
    };

    println!(
        "Done! Generated data json at: {}",
        summary.output_file.display()
    );
    Ok(())
}
