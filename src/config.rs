//! Completion settings
//!
//! Loaded from `<config_dir>/rlu/completions.yaml` when present, then
//! overridden by `RLU_*` environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::script_runner::{RunScriptOpts, DEFAULT_TIMEOUT_MS};

pub const CONFIG_DIR_NAME: &str = "rlu";
pub const CONFIG_FILE_NAME: &str = "completions.yaml";

pub const ENV_SCRIPTS_DIR: &str = "RLU_SCRIPTS_DIR";
pub const ENV_INTERPRETER: &str = "RLU_INTERPRETER";
pub const ENV_TIMEOUT_MS: &str = "RLU_COMPLETION_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    /// Directory holding the rlu helper scripts
    pub scripts_dir: PathBuf,
    /// Program used to run the helper scripts
    pub interpreter: String,
    /// Time budget per helper script invocation
    pub timeout_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            interpreter: "bash".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// `~/.rlu`, where rlu installs its helper scripts
fn default_scripts_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".rlu")
}

/// Location of the optional config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl CompletionConfig {
    /// Config file (if any) plus environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a YAML config file; missing keys keep their defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, ?config, "loaded completion config");
        Ok(config)
    }

    /// Apply `RLU_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_SCRIPTS_DIR).filter(|v| !v.is_empty()) {
            self.scripts_dir = PathBuf::from(dir);
        }
        if let Some(interpreter) = lookup(ENV_INTERPRETER).filter(|v| !v.is_empty()) {
            self.interpreter = interpreter;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse() {
                Ok(ms) => self.timeout_ms = ms,
                Err(_) => warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT_MS),
            }
        }
    }

    /// Full path of a helper script
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.scripts_dir.join(script)
    }

    /// Command running `script` with `args` through the interpreter
    pub fn script_command(&self, script: &str, args: &[String]) -> Vec<String> {
        let mut argv = vec![
            self.interpreter.clone(),
            self.script_path(script).to_string_lossy().to_string(),
        ];
        argv.extend(args.iter().cloned());
        argv
    }

    pub fn run_opts(&self) -> RunScriptOpts {
        RunScriptOpts::with_timeout_ms(self.timeout_ms)
    }
}
