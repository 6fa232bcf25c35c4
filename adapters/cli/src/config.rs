//! Optional TOML run configuration merged with command-line flags.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

/// Tick budget applied when neither the file nor the flags set one.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 10_000;

/// Failures raised while loading a run configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Read {
        /// Location that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or carries unknown keys.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        /// Location of the malformed file.
        path: PathBuf,
        /// Underlying parser failure.
        #[source]
        source: toml::de::Error,
    },
    /// `max_ticks` was set to zero.
    #[error("max_ticks in {} must be greater than zero", path.display())]
    ZeroTickBudget {
        /// Location of the offending file.
        path: PathBuf,
    },
}

/// Values accepted in a run configuration file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) autopilot: Option<bool>,
    pub(crate) log_filter: Option<String>,
}

impl FileConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.max_ticks == Some(0) {
            return Err(ConfigError::ZeroTickBudget {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) seed: Option<u64>,
    pub(crate) max_ticks: u64,
    pub(crate) autopilot: bool,
    pub(crate) log_filter: Option<String>,
    pub(crate) json: bool,
    pub(crate) realtime: bool,
}

/// Flag values that take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) autopilot: bool,
    pub(crate) log_filter: Option<String>,
    pub(crate) json: bool,
    pub(crate) realtime: bool,
}

impl Settings {
    /// Layers `overrides` on top of `file`.
    pub(crate) fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        Self {
            seed: overrides.seed.or(file.seed),
            max_ticks: overrides
                .max_ticks
                .or(file.max_ticks)
                .unwrap_or(DEFAULT_MAX_TICKS),
            autopilot: overrides.autopilot || file.autopilot.unwrap_or(false),
            log_filter: overrides.log_filter.or(file.log_filter),
            json: overrides.json,
            realtime: overrides.realtime,
        }
    }
}
