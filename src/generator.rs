//! Generators for dynamic argument suggestions
//!
//! A generator pairs the command to run with the parser for its output.
//! The command is either fixed or computed from the typed tokens.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::completions::Suggestion;
use crate::post_process::PostProcess;
use crate::script_runner::{capture_stdout, RunScriptOpts};

/// Computes a command from the tokens typed so far
pub type ScriptFn = dyn Fn(&[String]) -> Vec<String> + Send + Sync;

/// Where a generator's command comes from
#[derive(Clone)]
pub enum ScriptSource {
    Static(Vec<String>),
    Dynamic(Arc<ScriptFn>),
}

impl ScriptSource {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
    {
        ScriptSource::Dynamic(Arc::new(f))
    }

    /// Command for the given tokens
    pub fn resolve(&self, tokens: &[String]) -> Vec<String> {
        match self {
            ScriptSource::Static(argv) => argv.clone(),
            ScriptSource::Dynamic(f) => f(tokens),
        }
    }
}

impl fmt::Debug for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::Static(argv) => f.debug_tuple("Static").field(argv).finish(),
            ScriptSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

// Dynamic sources have no static command to show.
impl Serialize for ScriptSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScriptSource::Static(argv) => argv.serialize(serializer),
            ScriptSource::Dynamic(_) => serializer.serialize_str("<from context>"),
        }
    }
}

/// Generator for dynamic completions
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub script: ScriptSource,
    pub post_process: PostProcess,
}

impl Generator {
    pub fn new(script: ScriptSource, post_process: PostProcess) -> Self {
        Self { script, post_process }
    }

    /// Command this generator runs for the given tokens
    pub fn script_args(&self, tokens: &[String]) -> Vec<String> {
        self.script.resolve(tokens)
    }

    /// Run the script and parse its output. Failures yield no suggestions.
    pub async fn resolve(&self, tokens: &[String], opts: &RunScriptOpts) -> Vec<Suggestion> {
        let argv = self.script_args(tokens);
        debug!(command = ?argv, "running generator");

        let out = capture_stdout(&argv, opts).await;
        let suggestions = self.post_process.apply(&out);
        debug!(count = suggestions.len(), "generator finished");
        suggestions
    }
}
