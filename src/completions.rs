//! Command Completion Engine for rlu_complete
//!
//! Provides TAB completion suggestions for subcommands, options and
//! option arguments. Follows the Fig completion spec layout.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::context::today;
use crate::generator::Generator;
use crate::script_runner::RunScriptOpts;

/// A completion specification for a command
#[derive(Clone, Debug, Serialize)]
pub struct CompletionSpec {
    /// The command name
    pub name: String,
    pub description: String,
    /// Subcommands
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CompletionSpec>,
    /// Options/flags
    pub options: Vec<OptionSpec>,
}

/// Specification for a command option/flag
#[derive(Clone, Debug, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    /// Argument taken by this option, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgSpec>,
}

/// Specification for an option argument
#[derive(Clone, Debug, Serialize)]
pub struct ArgSpec {
    pub name: String,
    pub description: String,
    /// Value used when the option is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgDefault>,
    /// Generator for dynamic suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generators: Option<Generator>,
}

/// Default value of an argument
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ArgDefault {
    /// Local date when the default is read
    Today,
    Fixed(String),
}

impl ArgDefault {
    pub fn value(&self) -> String {
        match self {
            ArgDefault::Today => today(),
            ArgDefault::Fixed(value) => value.clone(),
        }
    }
}

/// A suggestion returned by the completion engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Text shown in the list
    pub name: String,
    pub description: String,
    /// Text inserted when the suggestion is picked
    pub insert_value: String,
}

impl Suggestion {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        insert_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            insert_value: insert_value.into(),
        }
    }
}

impl CompletionSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            subcommands: vec![],
            options: vec![],
        }
    }

    pub fn subcommand(mut self, sub: CompletionSpec) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&CompletionSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }
}

impl OptionSpec {
    /// Option without an argument
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args: None,
        }
    }

    pub fn with_arg(name: impl Into<String>, description: impl Into<String>, arg: ArgSpec) -> Self {
        Self {
            args: Some(arg),
            ..Self::flag(name, description)
        }
    }
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: None,
            generators: None,
        }
    }

    pub fn with_default(mut self, default: ArgDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.generators = Some(generator);
        self
    }
}

/// The main completion engine
///
/// Cheap to clone; the spec is shared read-only between clones.
#[derive(Clone, Debug)]
pub struct CompletionEngine {
    spec: Arc<CompletionSpec>,
    opts: RunScriptOpts,
}

impl CompletionEngine {
    pub fn new(spec: CompletionSpec, opts: RunScriptOpts) -> Self {
        Self {
            spec: Arc::new(spec),
            opts,
        }
    }

    pub fn spec(&self) -> &CompletionSpec {
        &self.spec
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&CompletionSpec> {
        self.spec.find_subcommand(name)
    }

    /// List all subcommand names
    pub fn list_subcommands(&self) -> Vec<&str> {
        self.spec.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    /// Suggestions for the words typed after the program name.
    ///
    /// The last token is the word under the cursor (empty right after a
    /// space). Never fails: anything unexpected yields no suggestions.
    pub async fn complete(&self, tokens: &[String]) -> Vec<Suggestion> {
        let Some((current, typed)) = tokens.split_last() else {
            return self.complete_root("");
        };
        let Some(sub_name) = typed.first() else {
            return self.complete_root(current);
        };
        let Some(sub) = self.spec.find_subcommand(sub_name) else {
            debug!(subcommand = %sub_name, "no spec for subcommand");
            return vec![];
        };

        if typed.len() > 1 {
            if let Some(arg) = typed
                .last()
                .and_then(|prev| sub.find_option(prev))
                .and_then(|opt| opt.args.as_ref())
            {
                return self.complete_arg(arg, tokens, current).await;
            }
        }

        self.complete_options(sub, typed, current)
    }

    /// Complete subcommand names and global options
    fn complete_root(&self, prefix: &str) -> Vec<Suggestion> {
        let subcommands = self
            .spec
            .subcommands
            .iter()
            .filter(|sub| sub.name.starts_with(prefix))
            .map(|sub| Suggestion::new(&sub.name, &sub.description, &sub.name));

        subcommands.chain(self.global_options(prefix)).collect()
    }

    /// Complete options of a subcommand that were not typed yet
    fn complete_options(&self, sub: &CompletionSpec, typed: &[String], prefix: &str) -> Vec<Suggestion> {
        let options = sub
            .options
            .iter()
            .filter(|opt| opt.name.starts_with(prefix))
            .filter(|opt| !typed.iter().any(|t| *t == opt.name))
            .map(|opt| Suggestion::new(&opt.name, &opt.description, &opt.name));

        options.chain(self.global_options(prefix)).collect()
    }

    fn global_options<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = Suggestion> + 'a {
        self.spec
            .options
            .iter()
            .filter(move |opt| opt.name.starts_with(prefix))
            .map(|opt| Suggestion::new(&opt.name, &opt.description, &opt.name))
    }

    /// Complete the value of an option argument
    async fn complete_arg(&self, arg: &ArgSpec, tokens: &[String], prefix: &str) -> Vec<Suggestion> {
        if let Some(generator) = &arg.generators {
            return generator
                .resolve(tokens, &self.opts)
                .await
                .into_iter()
                .filter(|s| s.insert_value.starts_with(prefix))
                .collect();
        }

        match &arg.default {
            Some(default) => {
                let value = default.value();
                if value.starts_with(prefix) {
                    vec![Suggestion::new(&value, &arg.description, &value)]
                } else {
                    vec![]
                }
            }
            None => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompletionConfig;
    use crate::rlu_spec::rlu_spec;
    use std::fs;
    use std::path::Path;

    fn tokens(line: &str) -> Vec<String> {
        line.split(' ').map(String::from).collect()
    }

    fn write_script(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn engine_with_scripts(dir: &Path) -> CompletionEngine {
        let config = CompletionConfig {
            scripts_dir: dir.to_path_buf(),
            interpreter: "sh".into(),
            timeout_ms: 5_000,
        };
        CompletionEngine::new(rlu_spec(&config), config.run_opts())
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_subcommand_completion() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        let suggestions = engine.complete(&tokens("")).await;
        assert!(suggestions.iter().any(|s| s.name == "output-content"));
        assert!(suggestions.iter().any(|s| s.name == "--help"));

        let suggestions = engine.complete(&tokens("a")).await;
        assert_eq!(names(&suggestions), ["add", "add-to-start", "append-to-end", "add-child-node"]);

        assert!(!engine.complete(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_option_completion() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        let suggestions = engine.complete(&tokens("add --title x ")).await;
        assert_eq!(names(&suggestions), ["--content", "--date", "--help", "--version"]);

        let suggestions = engine.complete(&tokens("add --c")).await;
        assert_eq!(names(&suggestions), ["--content"]);
    }

    #[tokio::test]
    async fn test_unknown_subcommand() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        assert!(engine.complete(&tokens("frobnicate ")).await.is_empty());
    }

    #[tokio::test]
    async fn test_date_default() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        let suggestions = engine.complete(&tokens("show --date ")).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].insert_value, today());
    }

    #[tokio::test]
    async fn test_fixed_default() {
        let spec = CompletionSpec::new("tool", "").subcommand(
            CompletionSpec::new("run", "").option(OptionSpec::with_arg(
                "--mode",
                "",
                ArgSpec::new("mode", "Run mode").with_default(ArgDefault::Fixed("fast".into())),
            )),
        );
        let engine = CompletionEngine::new(spec, RunScriptOpts::default());
        assert_eq!(
            engine.complete(&tokens("run --mode f")).await,
            vec![Suggestion::new("fast", "Run mode", "fast")]
        );
        assert!(engine.complete(&tokens("run --mode s")).await.is_empty());
        assert_eq!(engine.list_subcommands(), ["run"]);
        assert!(engine.find_subcommand("run").is_some());
    }

    #[tokio::test]
    async fn test_free_text_argument() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        assert!(engine.complete(&tokens("add --title ")).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_scripts_yield_nothing() {
        let engine = engine_with_scripts(Path::new("/nonexistent"));
        assert!(engine.complete(&tokens("delete --entry-id ")).await.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_entry_ids_from_script() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "list_entry_ids.sh", "printf 'abc123\\nabd456\\nxyz789\\n'\n");
        let engine = engine_with_scripts(dir.path());

        let suggestions = engine.complete(&tokens("delete --entry-id ")).await;
        assert_eq!(names(&suggestions), ["abc123", "abd456", "xyz789"]);
        assert!(suggestions.iter().all(|s| s.description == "Entry ID"));

        let suggestions = engine.complete(&tokens("append-to-end --entry-id ab")).await;
        assert_eq!(names(&suggestions), ["abc123", "abd456"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_entries_for_typed_date() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "fetch_entry_ids.sh", "echo \"id-$1 Entry for $1\"\n");
        let engine = engine_with_scripts(dir.path());

        let suggestions = engine
            .complete(&tokens("output-content --date 2024-03-01 --entry-id "))
            .await;
        assert_eq!(
            suggestions,
            vec![Suggestion::new("Entry for 2024-03-01", "id-2024-03-01", "id-2024-03-01")]
        );

        let suggestions = engine.complete(&tokens("output-content --entry-id ")).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].insert_value, format!("id-{}", today()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fatal_output_from_script() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "list_entry_ids.sh", "echo 'fatal: graph not open'\necho abc123\n");
        let engine = engine_with_scripts(dir.path());
        assert!(engine.complete(&tokens("delete --entry-id ")).await.is_empty());
    }
}
