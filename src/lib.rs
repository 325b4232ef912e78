//! rlu_complete - dynamic completion suggestions for the rlu journal CLI
//!
//! Modules:
//! - context: values of flags already typed (e.g. `--date`)
//! - script_runner: helper script execution with timeout
//! - post_process: helper script output to suggestions
//! - generator: script source + post-processor per argument
//! - completions: completion spec types and the completion engine
//! - rlu_spec: the rlu command tree
//! - config: script directory, interpreter and timeout settings

pub mod context;
pub mod script_runner;
pub mod post_process;
pub mod generator;
pub mod completions;
pub mod rlu_spec;
pub mod config;

// Re-export key types for convenience
pub use completions::{
    ArgDefault, ArgSpec, CompletionEngine, CompletionSpec, OptionSpec, Suggestion,
};

pub use config::{CompletionConfig, ConfigError};

pub use generator::{Generator, ScriptSource};

pub use post_process::PostProcess;

pub use rlu_spec::rlu_spec;

pub use script_runner::{capture_stdout, run_script, RunScriptOpts, RunScriptResult};
