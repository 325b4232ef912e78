//! Post-processing of helper script output into suggestions
//!
//! The rlu helper scripts have two output contracts. `fetch_entry_ids.sh`
//! prints `<id> <title>` per line, `list_entry_ids.sh` prints bare ids.
//! Each generator names the contract of the script it runs; the two are
//! not interchangeable.

use serde::Serialize;
use tracing::debug;

use crate::completions::Suggestion;

/// Output prefix a helper script uses to report failure
pub const FATAL_SENTINEL: &str = "fatal:";

/// Label used when an entry has no title
pub const ENTRY_ID_LABEL: &str = "Entry ID";

/// Output contract of a helper script
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PostProcess {
    /// `<id> <title>` lines: title shown, id inserted
    EntryWithTitle,
    /// `<id>` lines
    EntryIdOnly,
}

impl PostProcess {
    /// Parse raw script output. Total: any input yields a (possibly empty) list.
    pub fn apply(&self, out: &str) -> Vec<Suggestion> {
        if out.starts_with(FATAL_SENTINEL) {
            debug!(output = %out.trim_end(), "helper script reported failure");
            return vec![];
        }

        out.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match self {
                PostProcess::EntryWithTitle => entry_with_title(line),
                PostProcess::EntryIdOnly => entry_id_only(line),
            })
            .collect()
    }
}

fn entry_with_title(line: &str) -> Suggestion {
    let line = line.trim_start();
    let (id, title) = match line.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (line.trim_end(), ""),
    };
    let name = if title.is_empty() { ENTRY_ID_LABEL } else { title };

    Suggestion::new(name, id, id.trim())
}

fn entry_id_only(line: &str) -> Suggestion {
    let id = line.trim();
    Suggestion::new(id, ENTRY_ID_LABEL, id)
}
