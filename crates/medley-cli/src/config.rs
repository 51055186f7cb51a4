//! Configuration management for the medley CLI.

use anyhow::{bail, Context, Result};
use medley_consistent::DEFAULT_VNODES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file searched for in the current and parent directories.
pub const CONFIG_FILE: &str = "medley.toml";

/// Medley CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ring: RingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_vnodes")]
    pub vnodes: usize,
    #[serde(default)]
    pub services: Vec<String>,
}

fn default_algorithm() -> String { medley::ALGORITHM_MURMUR3.to_string() }
fn default_vnodes() -> usize { DEFAULT_VNODES }

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            vnodes: default_vnodes(),
            services: Vec::new(),
        }
    }
}

impl RingConfig {
    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        algorithm: Option<String>,
        vnodes: Option<usize>,
        services: Option<Vec<String>>,
    ) -> Self {
        if let Some(algorithm) = algorithm {
            self.algorithm = algorithm;
        }
        if let Some(vnodes) = vnodes {
            self.vnodes = vnodes;
        }
        if let Some(services) = services {
            self.services = services;
        }
        self
    }

    /// The services, failing if there are none.
    pub fn require_services(&self) -> Result<&[String]> {
        if self.services.is_empty() {
            bail!(
                "no services configured; add them to [ring] in {} or pass --services",
                CONFIG_FILE
            );
        }
        Ok(&self.services)
    }

    pub fn hash_config(&self) -> medley_consistent::Config {
        medley_consistent::Config::new()
            .with_algorithm(self.algorithm.clone())
            .with_vnodes(self.vnodes)
    }
}

impl Config {
    /// Load config from medley.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::load_from(&cwd)
    }

    /// Load config from medley.toml in `dir` or its parents, falling back to
    /// defaults when there is none.
    pub fn load_from(dir: &Path) -> Result<Self> {
        match find_config_file(dir) {
            Some(path) => Self::read(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find medley.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.ring.algorithm, "murmur3");
        assert_eq!(config.ring.vnodes, DEFAULT_VNODES);
        assert!(config.ring.require_services().is_err());
    }

    #[test]
    fn test_found_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[ring]\nalgorithm = \"fnv\"\nservices = [\"a.net\", \"b.net\"]\n",
        )
        .unwrap();

        let nested = dir.path().join("one").join("two");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config_file(&nested), Some(dir.path().join(CONFIG_FILE)));

        let config = Config::load_from(&nested).unwrap();
        assert_eq!(config.ring.algorithm, "fnv");
        assert_eq!(config.ring.vnodes, DEFAULT_VNODES);
        assert_eq!(config.ring.require_services().unwrap(), ["a.net", "b.net"]);
    }

    #[test]
    fn test_save_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = Config {
            ring: RingConfig::default().with_overrides(
                None,
                Some(64),
                Some(vec!["x.net".to_string()]),
            ),
        };
        config.save(&path).unwrap();

        let loaded = Config::read(&path).unwrap();
        assert_eq!(loaded.ring.vnodes, 64);
        assert_eq!(loaded.ring.services, vec!["x.net".to_string()]);
        assert_eq!(loaded.ring.hash_config().vnodes, 64);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[ring\n").unwrap();
        let err = Config::read(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
