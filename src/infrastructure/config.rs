//! Configuration management

use crate::error::{DjediError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up next to the template being rendered
pub const CONFIG_FILE: &str = "djedi.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Whether rendered nodes carry editor affordances
    #[serde(default = "default_edit")]
    pub edit: bool,

    /// Content file used when --content is not given
    #[serde(default)]
    pub content: Option<PathBuf>,
}

fn default_edit() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            edit: true,
            content: None,
        }
    }
}

impl Config {
    /// Load config from a djedi.toml file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DjediError::Config(format!("Config file not found: {}", path.display()))
            } else {
                DjediError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| DjediError::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Load djedi.toml from a directory, falling back to defaults when absent
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Config::default())
        }
    }
}
