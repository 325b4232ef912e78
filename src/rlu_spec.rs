//! Completion spec for the `rlu` Logseq journal CLI

use crate::completions::{ArgDefault, ArgSpec, CompletionSpec, OptionSpec};
use crate::config::CompletionConfig;
use crate::context::date_or_today;
use crate::generator::{Generator, ScriptSource};
use crate::post_process::PostProcess;

/// Prints `<id> <title>` for the entries of the date given as first argument
pub const FETCH_ENTRY_IDS_SCRIPT: &str = "fetch_entry_ids.sh";
/// Prints one entry id per line
pub const LIST_ENTRY_IDS_SCRIPT: &str = "list_entry_ids.sh";

/// Build the spec tree, resolving script paths against `config`
pub fn rlu_spec(config: &CompletionConfig) -> CompletionSpec {
    CompletionSpec::new("rlu", "CLI for interacting with Logseq")
        .subcommand(
            CompletionSpec::new("output-content", "Output the content of a specific journal entry")
                .option(OptionSpec::with_arg(
                    "--entry-id",
                    "The ID of the journal entry to get",
                    entry_id_arg().with_generator(entries_for_date(config)),
                ))
                .option(date_option("The date to filter journal entries")),
        )
        .subcommand(
            CompletionSpec::new("show", "Show journal entries for a specific date")
                .option(date_option("The date of the journal entries to show")),
        )
        .subcommand(
            CompletionSpec::new("add", "Add a new journal entry")
                .option(OptionSpec::with_arg(
                    "--title",
                    "Title of the journal entry",
                    ArgSpec::new("title", "Title of the entry"),
                ))
                .option(OptionSpec::with_arg(
                    "--content",
                    "Content of the journal entry",
                    ArgSpec::new("content", "Content of the entry"),
                ))
                .option(date_option("Date for the journal entry (YYYY-MM-DD)")),
        )
        .subcommand(
            CompletionSpec::new("add-to-start", "Add content to the start of a journal entry")
                .option(entry_id_option(config, "The ID of the journal entry to update"))
                .option(content_option("Content to add at the start", "Content to add")),
        )
        .subcommand(
            CompletionSpec::new("append-to-end", "Append content to the end of a journal entry")
                .option(entry_id_option(config, "The ID of the journal entry to update"))
                .option(content_option("Content to append", "Content to append")),
        )
        .subcommand(
            CompletionSpec::new("add-child-node", "Add a child node to a journal entry")
                .option(entry_id_option(config, "The ID of the journal entry to update"))
                .option(content_option(
                    "Content of the child node",
                    "Content of the child node",
                )),
        )
        .subcommand(
            CompletionSpec::new("delete", "Delete a journal entry by ID")
                .option(entry_id_option(config, "The ID of the journal entry to delete")),
        )
        .option(OptionSpec::flag(
            "--help",
            "Print this message or the help of the given subcommand(s)",
        ))
        .option(OptionSpec::flag("--version", "Show version of rlu"))
}

fn entry_id_arg() -> ArgSpec {
    ArgSpec::new("entry_id", "The ID of the journal entry")
}

/// `--entry-id` completed from all known entry ids
fn entry_id_option(config: &CompletionConfig, description: &str) -> OptionSpec {
    OptionSpec::with_arg(
        "--entry-id",
        description,
        entry_id_arg().with_generator(all_entries(config)),
    )
}

fn date_option(description: &str) -> OptionSpec {
    OptionSpec::with_arg(
        "--date",
        description,
        ArgSpec::new("date", "The date to filter journal entries by (YYYY-MM-DD)")
            .with_default(ArgDefault::Today),
    )
}

fn content_option(description: &str, arg_description: &str) -> OptionSpec {
    OptionSpec::with_arg("--content", description, ArgSpec::new("content", arg_description))
}

fn all_entries(config: &CompletionConfig) -> Generator {
    Generator::new(
        ScriptSource::Static(config.script_command(LIST_ENTRY_IDS_SCRIPT, &[])),
        PostProcess::EntryIdOnly,
    )
}

/// Entries of the typed `--date`, or of today
fn entries_for_date(config: &CompletionConfig) -> Generator {
    let config = config.clone();
    Generator::new(
        ScriptSource::dynamic(move |tokens| {
            config.script_command(FETCH_ENTRY_IDS_SCRIPT, &[date_or_today(tokens)])
        }),
        PostProcess::EntryWithTitle,
    )
}
