// src/engine/config.rs

//! Runtime configuration.
//!
//! Layered the usual way:
//! 1. Defaults in code
//! 2. An optional `dealcalc.toml` in the working directory
//! 3. Environment overrides with the `DEALCALC_` prefix (e.g. `DEALCALC_STRATEGY=roi`)

use crate::error::Result;
use crate::strategy::optimization::DEFAULT_MAX_ITERATIONS;
use config::{Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding `{name}.json` scenario files.
    pub scenario_dir: PathBuf,
    /// Directory CSV reports are written to.
    pub report_dir: PathBuf,
    /// Scenario to run; seeded with a sample catalog when missing.
    pub scenario_name: String,
    /// Allocation strategy name (`proportional`, `roi`, `minimum`).
    pub strategy: String,
    /// Re-run allocation even if the scenario already carries quantities.
    pub reallocate: bool,
    pub optimize: bool,
    pub max_iterations: usize,
    /// Randomized catalog size for new scenarios; 0 uses the demo catalog.
    pub sample_products: usize,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scenario_dir: PathBuf::from("scenarios"),
            report_dir: PathBuf::from("reports"),
            scenario_name: "demo".to_string(),
            strategy: "proportional".to_string(),
            reallocate: false,
            optimize: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sample_products: 0,
            log_filter: "deal_calculator=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional file and environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from("dealcalc")
    }

    /// Same as [`AppConfig::load`] with an explicit config file stem.
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let defaults = Self::default();

        let config = config::Config::builder()
            .set_default("scenario_dir", defaults.scenario_dir.to_string_lossy().as_ref())?
            .set_default("report_dir", defaults.report_dir.to_string_lossy().as_ref())?
            .set_default("scenario_name", defaults.scenario_name)?
            .set_default("strategy", defaults.strategy)?
            .set_default("reallocate", defaults.reallocate)?
            .set_default("optimize", defaults.optimize)?
            .set_default("max_iterations", defaults.max_iterations as u64)?
            .set_default("sample_products", defaults.sample_products as u64)?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("DEALCALC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
