use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server configuration, fixed for the lifetime of the process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories to serve, highest priority first
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// File served when no root satisfies a request
    #[serde(default)]
    pub fallback: Option<PathBuf>,

    /// Produce merged directory listings for `/dir/` requests
    #[serde(default = "default_listing")]
    pub listing: bool,
}

fn default_listing() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            fallback: None,
            listing: default_listing(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Root list with the current directory substituted when none is configured
    pub fn normalized_roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.roots.clone()
        }
    }
}
