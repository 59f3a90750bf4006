use crate::{
    app::ServiceOptions,
    catalog::{DEFAULT_SEARCH_LIMIT, DEFAULT_TOP_N, DEFAULT_VOCABULARY_SIZE},
    dataset::DatasetPaths,
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf};

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_MOVIES_PATH: &str = "tmdb_5000_movies.csv";
const DEFAULT_CREDITS_PATH: &str = "tmdb_5000_credits.csv";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Locations of the raw tables
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    #[serde(default = "default_credits_path")]
    pub credits_path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            movies_path: default_movies_path(),
            credits_path: default_credits_path(),
        }
    }
}

fn default_movies_path() -> String {
    DEFAULT_MOVIES_PATH.to_string()
}

fn default_credits_path() -> String {
    DEFAULT_CREDITS_PATH.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Maximum number of vocabulary terms
    #[serde(default = "vocabulary_size")]
    pub vocabulary_size: usize,

    /// Recommendations returned when the caller doesn't ask for a count
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    #[serde(default = "search_limit")]
    pub search_limit: usize,

    #[serde(default = "listen_addr")]
    pub listen_addr: String,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            vocabulary_size: vocabulary_size(),
            default_recommendations: default_recommendations(),
            search_limit: search_limit(),
            listen_addr: listen_addr(),
            base_path: PathBuf::new(),
        }
    }
}

fn vocabulary_size() -> usize {
    DEFAULT_VOCABULARY_SIZE
}

fn default_recommendations() -> usize {
    DEFAULT_TOP_N
}

fn search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.vocabulary_size == 0 {
            bail!("vocabulary_size must be greater than 0");
        }

        if self.default_recommendations == 0 {
            bail!("default_recommendations must be greater than 0");
        }

        if self.search_limit == 0 {
            bail!("search_limit must be greater than 0");
        }

        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("listen_addr '{}' is not a valid address", self.listen_addr))?;

        Ok(())
    }

    /// Load `config.yaml` from `base_path`, creating it with defaults if missing.
    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let base = PathBuf::from(base_path);
        std::fs::create_dir_all(&base)
            .with_context(|| format!("couldn't create {}", base.display()))?;

        let path = base.join(CONFIG_FILE);
        if !path.exists() {
            log::info!("creating default config at {}", path.display());
            let default = Self {
                base_path: base.clone(),
                ..Default::default()
            };
            default.save()?;
        }

        let config_str = std::fs::read_to_string(&path)
            .with_context(|| format!("couldn't read {}", path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base;
        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = self.base_path.join(CONFIG_FILE);
        let temp_path = self.base_path.join(format!("{CONFIG_FILE}-tmp"));

        let config_str = serde_yml::to_string(&self)?;
        std::fs::write(&temp_path, config_str.as_bytes())?;
        std::fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Dataset locations; relative paths resolve against the working directory.
    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            movies: PathBuf::from(&self.dataset.movies_path),
            credits: PathBuf::from(&self.dataset.credits_path),
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            default_recommendations: self.default_recommendations,
            search_limit: self.search_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_config() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().to_str().unwrap();

        let config = Config::load_with(base).unwrap();
        assert!(tmp.path().join(CONFIG_FILE).exists());
        assert_eq!(config.vocabulary_size, 5000);
        assert_eq!(config.default_recommendations, 5);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.dataset.movies_path, "tmdb_5000_movies.csv");
    }

    #[test]
    fn test_fills_missing_fields() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "vocabulary_size: 300\n").unwrap();

        let config = Config::load_with(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(config.vocabulary_size, 300);
        assert_eq!(config.listen_addr, "0.0.0.0:5000");

        // upgraded file now carries every field
        let saved = std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(saved.contains("listen_addr"));
    }

    #[test]
    fn test_rejects_zero_vocabulary() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "vocabulary_size: 0\n").unwrap();

        assert!(Config::load_with(tmp.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_rejects_bad_listen_addr() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "listen_addr: nowhere\n").unwrap();

        assert!(Config::load_with(tmp.path().to_str().unwrap()).is_err());
    }
}
