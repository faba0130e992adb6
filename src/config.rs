// File: src/config.rs
use crate::core::merge::RegressionPolicy;
use crate::core::writer::DEFAULT_SNAPSHOT_NAME;
use crate::error::{FreqError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `charfreq.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Snapshot files, oldest first.
    pub snapshots: Vec<PathBuf>,
    pub on_regression: RegressionPolicy,
    /// Declaration name written by the snapshot writer.
    pub snapshot_name: String,
    /// Characters the text counter ignores on top of the built-in set.
    pub extra_skip: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            on_regression: RegressionPolicy::default(),
            snapshot_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            extra_skip: String::new(),
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "charfreq.toml";

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a config file. Relative snapshot paths are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| FreqError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            for snapshot in &mut config.snapshots {
                if snapshot.is_relative() {
                    *snapshot = base.join(&*snapshot);
                }
            }
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// `explicit` if given, else `charfreq.toml` in the working directory if
    /// present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(Self::FILE_NAME);
                if local.is_file() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
