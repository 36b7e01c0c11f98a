//! CareerLift configuration.
//!
//! Loaded from `config.toml` in the platform config directory. A missing file
//! means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistOptions, DEFAULT_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Database file. Defaults to the platform data directory.
    pub database: Option<PathBuf>,
    /// How many pending actions the weekly checklist shows.
    pub checklist_limit: usize,
    /// Show generic suggestions when nothing is pending.
    pub include_fallback: bool,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            checklist_limit: DEFAULT_LIMIT,
            include_fallback: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "careerlift").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn checklist_options(&self) -> ChecklistOptions {
        ChecklistOptions {
            limit: self.checklist_limit,
            include_fallback: self.include_fallback,
        }
    }
}
