//! Drives scripts through the engine and exports the results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ExecutionError;
use crate::parsing::{load_script, Command};
use crate::report::Report;
use crate::simulation::engine::SimulationEngine;

/// Name the input script is copied to inside each run directory.
pub const SCRIPT_COPY_NAME: &str = "simulation.txt";

/// Applies commands to an engine it owns.
#[derive(Debug, Default)]
pub struct Executor {
    engine: SimulationEngine,
    continue_on_error: bool,
}

impl Executor {
    pub fn new(seed: u64) -> Self {
        Executor {
            engine: SimulationEngine::new(seed),
            continue_on_error: false,
        }
    }

    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn into_engine(self) -> SimulationEngine {
        self.engine
    }

    /// Runs commands in order. Earlier commands are never undone, and a failed
    /// plural add/delete keeps the elements it applied before the failing one.
    /// Returns the number of commands that failed and were skipped.
    pub fn execute_commands(&mut self, commands: &[Command]) -> Result<usize, ExecutionError> {
        info!(count = commands.len(), "executing commands");
        let mut skipped = 0;
        for (index, command) in commands.iter().enumerate() {
            if let Err(source) = command.execute(&mut self.engine) {
                if !self.continue_on_error {
                    return Err(ExecutionError::Command {
                        index,
                        operation: command.operation(),
                        source,
                    });
                }
                warn!(index, operation = command.operation(), error = %source, "command failed, continuing");
                skipped += 1;
            }
        }
        Ok(skipped)
    }

    pub fn execute_from_file(&mut self, path: &Path) -> Result<usize> {
        let commands = load_script(path).with_context(|| format!("loading script {}", path.display()))?;
        Ok(self.execute_commands(&commands)?)
    }
}

/// Runs one script and writes its report (plus a copy of the script) to
/// `dirout`.
pub fn execute_scenario(script: &Path, dirout: &Path, config: &Config) -> Result<Report> {
    let started = Instant::now();

    let mut executor = Executor::new(config.seed).continue_on_error(config.continue_on_error);
    let skipped = executor.execute_from_file(script)?;

    fs::create_dir_all(dirout).with_context(|| format!("creating {}", dirout.display()))?;
    fs::copy(script, dirout.join(SCRIPT_COPY_NAME))
        .with_context(|| format!("copying {} into {}", script.display(), dirout.display()))?;

    let report = Report::from_engine(executor.engine(), &config.audit, Local::now().naive_local());
    report
        .write(dirout)
        .with_context(|| format!("writing report to {}", dirout.display()))?;

    info!(
        script = %script.display(),
        skipped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scenario finished"
    );
    Ok(report)
}

/// Every file in `config.scenarios_dir` that passes the include/exclude
/// filters, sorted by name.
pub fn list_scenarios(config: &Config) -> Result<Vec<(String, PathBuf)>> {
    let dir = &config.scenarios_dir;
    let mut scenarios = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading scenarios directory {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if config.selects_scenario(&name) {
            scenarios.push((name, path));
        }
    }
    scenarios.sort();
    Ok(scenarios)
}

/// Runs each selected scenario into `output_dir/case_<name>`.
pub fn run_scenarios(config: &Config) -> Result<Vec<PathBuf>> {
    let scenarios = list_scenarios(config)?;
    if scenarios.is_empty() {
        warn!(dir = %config.scenarios_dir.display(), "no scenarios selected");
    }

    let mut written = Vec::with_capacity(scenarios.len());
    for (name, path) in scenarios {
        info!(scenario = %name, "running scenario");
        let dirout = config.output_dir.join(format!("case_{}", name));
        execute_scenario(&path, &dirout, config)?;
        written.push(dirout);
    }
    Ok(written)
}
