use anyhow::Result;
use recur_core::error::CoreError;
use recur_core::models::{CompletionResult, NewTaskData, Task};
use recur_core::reschedule::{TaskCreator, TaskRescheduler};

use crate::cli::CompleteCommand;
use crate::config::Config;
use crate::parser::date_or_now;
use crate::util::load_task;

/// Materializes drafts without persisting them; the caller prints the result.
struct DetachedCreator;

impl TaskCreator for DetachedCreator {
    fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        Ok(data.into_task())
    }
}

pub fn complete_task(command: CompleteCommand, config: &Config) -> Result<()> {
    let task = load_task(&command.task)?;
    let now = date_or_now(command.now.as_deref())?;

    match TaskRescheduler::new().complete(task, now, &DetachedCreator)? {
        CompletionResult::Single(task) => {
            println!("Completed task: '{}'", task.name);
            if task.recurrence.is_some() {
                println!("Recurrence has ended; no further instances.");
            }
        }
        CompletionResult::Recurring { completed, next } => {
            println!("Completed task: '{}'", completed.name);
            match next.plan_end_at {
                Some(due) => println!(
                    "Created recurring task '{}' for {}",
                    next.name,
                    due.format(&config.date_format)
                ),
                None => println!("Created recurring task '{}'", next.name),
            }
            println!("{}", serde_json::to_string_pretty(&next)?);
        }
    }
    Ok(())
}
