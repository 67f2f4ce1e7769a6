use crate::commands::history_from_config;
use crate::config::Config;
use crate::error::Result;
use crate::matching::preview;
use colored::Colorize;
use prettytable::{format, Table};

/// Print the most recent routing history entries
///
/// Reads a single context's log when `context` is given, otherwise the
/// central log.
pub fn run_history(config: &Config, context: Option<&str>, limit: usize) -> Result<()> {
    let log = history_from_config(config)?;
    let entries = match context {
        Some(context) => log.context_entries(context)?,
        None => log.central_entries()?,
    };

    if entries.is_empty() {
        println!("{}", "No routing history found.".yellow());
        return Ok(());
    }

    let skip = entries.len().saturating_sub(limit);

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Time".bold(),
        "Context".bold(),
        "Recommended".bold(),
        "Misrouted".bold(),
        "Keywords".bold(),
        "Message".bold()
    ]);

    for entry in entries.iter().skip(skip) {
        let misrouted = if entry.classification.is_misrouted {
            "yes".red()
        } else {
            "no".green()
        };
        table.add_row(prettytable::row![
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            entry.context.cyan(),
            entry.classification.recommended_context,
            misrouted,
            entry.classification.matched_keywords.join(", "),
            preview(&entry.message_preview, 40)
        ]);
    }

    match context {
        Some(context) => println!("\nRouting history for {}:", context.cyan()),
        None => println!("\nRouting history:"),
    }
    table.printstd();
    println!(
        "Showing {} of {} entries.",
        entries.len() - skip,
        entries.len()
    );
    println!();

    Ok(())
}
