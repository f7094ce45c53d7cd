//! Configuration loading.
//!
//! Looked up in order: `simple-query.toml` in the working directory, then
//! `<config dir>/simple-query/config.toml`, then built-in defaults.
//!
//! ```toml
//! dialect = "mysql"
//! max_depth = 32
//! max_take = 100
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::context::{CompileOptions, DEFAULT_MAX_DEPTH};
use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};

pub const LOCAL_CONFIG_FILE: &str = "simple-query.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dialect: Dialect,
    pub max_depth: usize,
    pub max_take: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_take: None,
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> QueryResult<Self> {
        toml::from_str(input).map_err(|e| QueryError::Config(e.to_string()))
    }

    pub fn from_path(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Path of the per-user configuration file, if the platform has one.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("simple-query").join("config.toml"))
    }

    /// First configuration file found, or defaults when there is none.
    pub fn load() -> QueryResult<Self> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        let candidates = std::iter::once(local).chain(Self::user_path());

        for path in candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            max_depth: self.max_depth,
            max_take: self.max_take,
        }
    }
}
