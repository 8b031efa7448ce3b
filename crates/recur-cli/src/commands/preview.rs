use anyhow::Result;
use recur_core::recurrence::RecurrenceEngine;

use crate::cli::PreviewCommand;
use crate::config::Config;
use crate::parser::date_or_now;
use crate::util::resolve_rule;
use crate::views::table::{display_occurrences, ViewOccurrence};

pub fn preview_occurrences(command: PreviewCommand, config: &Config) -> Result<()> {
    let rule = resolve_rule(&command.rule)?;
    let from = date_or_now(command.from.as_deref())?;
    let limit = command.limit.unwrap_or(config.preview_count);

    println!("Rule: {}", rule);
    let dates = RecurrenceEngine::new().preview(from, &rule, limit);
    display_occurrences(&ViewOccurrence::from_dates(&dates), &config.date_format);
    Ok(())
}
