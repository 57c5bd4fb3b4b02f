//! Configuration loading for the Bandwatch TUI.
//!
//! The config file is optional. Without `--config` or `BANDWATCH_TUI_CONFIG`
//! the built-in defaults are used; a file that is given must parse and pass
//! validation.

use bandwatch_core::VisConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    /// Redraw interval; also bounds how smooth transitions look.
    pub tick_rate_ms: u64,
    pub state_path: PathBuf,
    pub log_path: PathBuf,
    pub source: SourceConfig,
    #[serde(default)]
    pub vis: VisConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Built-in signal generator.
    Simulate,
    /// Newline-delimited JSON samples on standard input.
    Stdin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Sample period of the simulator. Ignored for stdin.
    pub interval_ms: u64,
    pub seed: Option<u64>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 33,
            state_path: PathBuf::from("bandwatch-state.json"),
            log_path: PathBuf::from("bandwatch.log"),
            source: SourceConfig {
                kind: SourceKind::Simulate,
                interval_ms: 250,
                seed: None,
            },
            vis: VisConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error(transparent)]
    Vis(#[from] bandwatch_core::ConfigError),
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "state_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.source.kind == SourceKind::Simulate && self.source.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.interval_ms",
                reason: "must be > 0 for the simulator".to_string(),
            });
        }
        self.vis.validate()?;
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("BANDWATCH_TUI_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
