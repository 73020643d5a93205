//! Pipeline configuration.
//!
//! Each setting resolves from, in order: command-line flags, the YAML file
//! given with `--config`, `PIIMAP_*` environment variables, and defaults
//! relative to the repository root. Relative paths resolve against the
//! repository root via [`resolve_path`](crate::resolve_path).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use piimap_index::INDEX_FILENAME;

use crate::{resolve_path, DATA_DIR_NAME};

/// Default coverage map filename at the repository root.
pub const COVERAGE_FILENAME: &str = "coverage.json";

pub const ENV_DATA_DIR: &str = "PIIMAP_DATA_DIR";
pub const ENV_INDEX_FILENAME: &str = "PIIMAP_INDEX_FILENAME";
pub const ENV_COVERAGE_PATH: &str = "PIIMAP_COVERAGE_PATH";

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
}

/// Contents of a `--config` YAML file. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub index_filename: Option<String>,
    pub coverage_path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Settings taken from `PIIMAP_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub data_dir: Option<PathBuf>,
    pub index_filename: Option<String>,
    pub coverage_path: Option<PathBuf>,
}

impl EnvConfig {
    /// Read from the process environment. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from),
            index_filename: get(ENV_INDEX_FILENAME),
            coverage_path: get(ENV_COVERAGE_PATH).map(PathBuf::from),
        }
    }
}

/// Fully resolved settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub repo_root: PathBuf,
    pub data_dir: PathBuf,
    pub index_filename: String,
    pub coverage_path: PathBuf,
}

impl PipelineConfig {
    /// Defaults for a repository rooted at `repo_root`.
    pub fn defaults(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            data_dir: repo_root.join(DATA_DIR_NAME),
            index_filename: INDEX_FILENAME.to_string(),
            coverage_path: repo_root.join(COVERAGE_FILENAME),
        }
    }

    pub fn resolve(
        repo_root: &Path,
        overrides: &ConfigOverrides,
        file: Option<&ConfigFile>,
        env: &EnvConfig,
    ) -> Self {
        let defaults = Self::defaults(repo_root);
        let file = file.cloned().unwrap_or_default();
        let path = |p: &PathBuf| resolve_path(p, repo_root);

        let data_dir = overrides
            .data_dir
            .as_ref()
            .or(file.data_dir.as_ref())
            .or(env.data_dir.as_ref())
            .map(path)
            .unwrap_or(defaults.data_dir);
        let index_filename = file
            .index_filename
            .or_else(|| env.index_filename.clone())
            .unwrap_or(defaults.index_filename);
        let coverage_path = file
            .coverage_path
            .as_ref()
            .or(env.coverage_path.as_ref())
            .map(path)
            .unwrap_or(defaults.coverage_path);

        Self {
            repo_root: repo_root.to_path_buf(),
            data_dir,
            index_filename,
            coverage_path,
        }
    }

    /// Resolve against the process environment, loading `config_path` if given.
    pub fn load(
        repo_root: &Path,
        overrides: &ConfigOverrides,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(p) => Some(ConfigFile::load(&resolve_path(p, repo_root))?),
            None => None,
        };
        let config = Self::resolve(repo_root, overrides, file.as_ref(), &EnvConfig::from_env());
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            index_filename = %config.index_filename,
            coverage_path = %config.coverage_path.display(),
            "resolved pipeline configuration"
        );
        Ok(config)
    }
}
