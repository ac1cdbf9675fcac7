//! Output formatting for resolved configuration values.

use crate::config::ResolvedEntry;
use clap::ValueEnum;

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned `key = value  (tier)` lines
    #[default]
    Text,
    /// JSON array of entries
    Json,
    /// `NAME='value'` lines suitable for a shell or `.env` file
    Env,
}

/// Render entries in the requested format.
pub fn format_entries(entries: &[ResolvedEntry<'_>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_entries_text(entries),
        OutputFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string());
            out.push('\n');
            out
        }
        OutputFormat::Env => format_entries_env(entries),
    }
}

pub fn format_entries_text(entries: &[ResolvedEntry<'_>]) -> String {
    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let marker = if entry.known { "" } else { ", unknown key" };
        out.push_str(&format!(
            "{:width$} = {}  ({}{})\n",
            entry.key,
            entry.value,
            entry.tier,
            marker,
            width = width
        ));
    }
    out
}

/// Unknown keys have no environment variable and are written as comments.
pub fn format_entries_env(entries: &[ResolvedEntry<'_>]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry.env_name {
            Some(ref name) => {
                out.push_str(&format!("{}={}\n", name, shell_quote(entry.value)));
            }
            None => out.push_str(&format!("# unknown key {}\n", entry.key)),
        }
    }
    out
}

/// Key and environment variable name, one pair per line.
pub fn format_env_names<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let pairs: Vec<(&str, String)> = pairs.into_iter().collect();
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, name) in pairs {
        out.push_str(&format!("{:width$}  {}\n", key, name, width = width));
    }
    out
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
