//! Run configuration: where raw documents live and where exports go.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the unzipped source documents
    pub input_dir: PathBuf,
    /// Root of the exports
    pub output_dir: PathBuf,
    /// Directory under `output_dir` receiving one file per table
    pub table_dir_name: String,
    pub votes_dir_name: String,
    pub acteurs_dir_name: String,
    pub votes_complete_file: String,
    pub acteurs_complete_file: String,
    /// Extension of source documents, without the dot
    pub document_extension: String,
    /// Documents read ahead concurrently (extraction itself is sequential)
    pub read_concurrency: usize,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/download/unzip"),
            output_dir: PathBuf::from("data/parser"),
            table_dir_name: "tables".to_string(),
            votes_dir_name: "votes".to_string(),
            acteurs_dir_name: "acteurs".to_string(),
            votes_complete_file: "votes-complete.json".to_string(),
            acteurs_complete_file: "acteurs-complete.json".to_string(),
            document_extension: "json".to_string(),
            read_concurrency: 8,
            verbose: false,
        }
    }
}

impl Config {
    /// Parses a TOML file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str::<Config>(&raw)?.normalized())
    }

    /// Defaults overridden by `HARVESTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Ok(Self::from_file(p)?.with_overrides(|key| std::env::var(key).ok())),
            None => Ok(Self::from_env()),
        }
    }

    fn with_overrides(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            input_dir: var("HARVESTER_INPUT_DIR").map(PathBuf::from).unwrap_or(self.input_dir),
            output_dir: var("HARVESTER_OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            read_concurrency: var("HARVESTER_READ_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.read_concurrency),
            verbose: var("HARVESTER_VERBOSE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose),
            ..self
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        self.read_concurrency = self.read_concurrency.max(1);
        self
    }

    pub fn votes_source_dir(&self) -> PathBuf {
        self.input_dir.join(&self.votes_dir_name)
    }

    pub fn acteurs_source_dir(&self) -> PathBuf {
        self.input_dir.join(&self.acteurs_dir_name)
    }

    pub fn table_dir(&self) -> PathBuf {
        self.output_dir.join(&self.table_dir_name)
    }
}
