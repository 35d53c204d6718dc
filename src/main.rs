use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use logop_sim::config::{load_config_from_file, Config};
use logop_sim::executor::{execute_scenario, run_scenarios};
use logop_sim::parsing::load_script;

#[derive(Parser)]
#[command(name = "logop-sim")]
#[command(version)]
#[command(about = "Replay command scripts against simulated users and export the generated texts")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the engine's random generator (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single script
    Run {
        /// Script file (.json, or the line format for anything else)
        #[arg(long)]
        script: PathBuf,

        /// Output directory for data.csv, info.csv and hist.csv
        #[arg(long)]
        out: PathBuf,

        /// Skip failing commands instead of aborting
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Run every scenario in a directory
    Scenarios {
        /// Scenario directory (overrides the config)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Root output directory (overrides the config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Scenario names to run (comma-separated)
        #[arg(long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Scenario names to skip (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// Parse and validate a script without running it
    Check {
        #[arg(long)]
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let mut config = match &cli.config {
        Some(path) => load_config_from_file(path).context("loading configuration")?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Commands::Run {
            script,
            out,
            continue_on_error,
        } => {
            config.continue_on_error |= continue_on_error;
            let report = execute_scenario(&script, &out, &config)?;
            println!(
                "{}: {} symbols, {} occurrences, {} histogram rows -> {}",
                script.display(),
                report.data.len(),
                report.locations.len(),
                report.histogram.len(),
                out.display()
            );
        }

        Commands::Scenarios {
            dir,
            out,
            include,
            exclude,
        } => {
            if let Some(dir) = dir {
                config.scenarios_dir = dir;
            }
            if let Some(out) = out {
                config.output_dir = out;
            }
            if let Some(include) = include {
                config.include = include;
            }
            if let Some(exclude) = exclude {
                config.exclude = exclude;
            }
            let written = run_scenarios(&config)?;
            info!(count = written.len(), "all scenarios finished");
            for dir in written {
                println!("{}", dir.display());
            }
        }

        Commands::Check { script } => {
            let commands = load_script(&script).with_context(|| format!("checking {}", script.display()))?;
            println!("{}: {} valid commands", script.display(), commands.len());
        }
    }

    Ok(())
}
