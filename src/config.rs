use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::simulation::engine::DEFAULT_SEED;

/// Run configuration, read from TOML. Every field has a default so a
/// partial (or empty) file is valid.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub seed: u64,
    pub output_dir: PathBuf,
    pub scenarios_dir: PathBuf,
    /// Scenario names to run; empty means all of them.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Keep going after a failed command instead of aborting the script.
    pub continue_on_error: bool,
    pub audit: AuditColumns,
}

/// Constant columns stamped onto every exported data row.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AuditColumns {
    pub record_type: String,
    pub tenant_id: String,
    pub config_id: String,
    pub global_id: String,
    pub full_sql: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from("out"),
            scenarios_dir: PathBuf::from("scenarios"),
            include: Vec::new(),
            exclude: Vec::new(),
            continue_on_error: false,
            audit: AuditColumns::default(),
        }
    }
}

impl Default for AuditColumns {
    fn default() -> Self {
        AuditColumns {
            record_type: "PA".to_string(),
            tenant_id: "1".to_string(),
            config_id: "2".to_string(),
            global_id: "3".to_string(),
            full_sql: "4".to_string(),
        }
    }
}

impl Config {
    /// Whether a scenario passes the include/exclude filters.
    pub fn selects_scenario(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|n| n == name);
        included && !self.exclude.iter().any(|n| n == name)
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|source| ConfigError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: file_path.to_path_buf(),
        source,
    })
}
