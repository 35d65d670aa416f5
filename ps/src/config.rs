//! Configuration for progressstore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the storage files
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Fixed denominator for percentage reporting
    #[serde(default = "default_total_nodes")]
    pub total_nodes: usize,

    /// Storage key the progress blob lives under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("progressstore")
}

fn default_total_nodes() -> usize {
    crate::DEFAULT_TOTAL_NODES
}

fn default_storage_key() -> String {
    crate::STORAGE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            total_nodes: default_total_nodes(),
            storage_key: default_storage_key(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("progressstore").join("config.yml")),
            Some(PathBuf::from("progressstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.total_nodes, 86);
        assert_eq!(config.storage_key, "math-progress");
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "total_nodes: 120").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.total_nodes, 120);
        assert_eq!(config.storage_key, "math-progress");
    }
}
