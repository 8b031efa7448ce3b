use anyhow::Result;
use recur_core::recurrence::RecurrenceEngine;

use crate::cli::NextCommand;
use crate::config::Config;
use crate::parser::date_or_now;
use crate::util::resolve_rule;

pub fn next_occurrence(command: NextCommand, config: &Config) -> Result<()> {
    let rule = resolve_rule(&command.rule)?;
    let base = date_or_now(command.from.as_deref())?;

    // The base date is the first occurrence of the rule's budget.
    match RecurrenceEngine::new().next_occurrence_counted(base, &rule, 1) {
        Some(next) => println!("{}", next.format(&config.date_format)),
        None => println!("No further occurrences"),
    }
    Ok(())
}
