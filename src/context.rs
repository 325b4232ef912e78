//! Context scanning over the tokens already typed on the command line
//!
//! Generators that depend on earlier arguments (e.g. listing entries for
//! the `--date` the user already typed) read those values from here.

use chrono::Local;

/// Flag carrying the journal date
pub const DATE_FLAG: &str = "--date";

/// Date format used by rlu and its helper scripts
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value following the first occurrence of `flag`, trimmed.
///
/// Returns `None` when the flag is absent, is the last token, or is
/// followed by an empty token (the word still being typed).
pub fn flag_value(tokens: &[String], flag: &str) -> Option<String> {
    let index = tokens.iter().position(|t| t == flag)?;
    tokens
        .get(index + 1)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like [`flag_value`], computing `fallback` only when the flag has no value
pub fn flag_value_or<F>(tokens: &[String], flag: &str, fallback: F) -> String
where
    F: FnOnce() -> String,
{
    flag_value(tokens, flag).unwrap_or_else(fallback)
}

/// Current local calendar date as `YYYY-MM-DD`
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// The typed `--date` value, or today's date
pub fn date_or_today(tokens: &[String]) -> String {
    flag_value_or(tokens, DATE_FLAG, today)
}
