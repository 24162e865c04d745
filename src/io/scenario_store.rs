// src/io/scenario_store.rs

use crate::error::{DealError, Result};
use crate::model::Scenario;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Named scenarios stored as `{name}.json` files in one directory.
///
/// Names are exact and case-sensitive. Saving an existing name overwrites it
/// (last write wins).
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    dir: PathBuf,
}

impl ScenarioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.trim().is_empty()
            || name.contains(['/', '\\'])
            || name.contains("..")
            || name.starts_with('.');
        if invalid {
            return Err(DealError::InvalidScenarioName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    pub fn save(&self, name: &str, scenario: &Scenario) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(scenario)?;
        fs::write(&path, json)?;

        info!(name, path = %path.display(), "scenario saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Scenario> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(DealError::ScenarioNotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&path)?;
        let scenario = serde_json::from_str(&contents)?;
        debug!(name, "scenario loaded");
        Ok(scenario)
    }

    /// Stored scenario names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(DealError::ScenarioNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        info!(name, "scenario deleted");
        Ok(())
    }
}
