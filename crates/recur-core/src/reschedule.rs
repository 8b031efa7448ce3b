use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::models::{CompletionResult, NewTaskData, Task, TaskStatus};
use crate::recurrence::RecurrenceEngine;

/// Persists task drafts on behalf of the rescheduler.
pub trait TaskCreator {
    fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
}

/// Turns the completion of a recurring task into the draft of its successor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskRescheduler {
    engine: RecurrenceEngine,
}

impl TaskRescheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft of the instance that follows `task`, or `None` when the task
    /// does not recur or its recurrence has ended.
    ///
    /// # Behavior
    /// - The next occurrence is computed from `plan_end_at`, or `now` when the
    ///   task has no planned end
    /// - The draft ends on the next occurrence
    /// - Range tasks with both bounds set keep their start-to-end span
    /// - The occurrence budget is checked against `task.occurrence_index`
    /// - A backward adjustment may land on or before the current planned end;
    ///   the draft is returned as computed and callers decide how to treat it
    pub fn next_instance(&self, task: &Task, now: NaiveDateTime) -> Option<NewTaskData> {
        let rule = task.recurrence.as_ref()?;
        let base = task.plan_end_at.unwrap_or(now);

        let Some(next) = self
            .engine
            .next_occurrence_counted(base, rule, task.occurrence_index)
        else {
            debug!(task_id = %task.id, %base, "recurrence ended");
            return None;
        };

        let plan_start_at = match (task.is_range, task.plan_start_at, task.plan_end_at) {
            (true, Some(start), Some(end)) => next.checked_sub_signed(end - start),
            _ => None,
        };

        Some(NewTaskData {
            name: task.name.clone(),
            description: task.description.clone(),
            status: TaskStatus::NotStarted,
            plan_start_at,
            plan_end_at: Some(next),
            is_range: task.is_range,
            recurrence: Some(rule.clone()),
            occurrence_index: task.occurrence_index.saturating_add(1),
            recurs_from: Some(task.id),
            project_id: task.project_id,
            tags: task.tags.clone(),
        })
    }

    /// Marks `task` completed at `now` and, if it recurs, creates its
    /// successor through `creator`.
    ///
    /// # Returns
    /// * `CompletionResult::Single` - the task does not recur (any more)
    /// * `CompletionResult::Recurring` - the completed task and its successor
    ///
    /// # Errors
    /// * `CoreError::InvalidInput` - the task was already completed
    /// * any error raised by `creator`
    pub fn complete<C: TaskCreator>(
        &self,
        task: Task,
        now: NaiveDateTime,
        creator: &C,
    ) -> Result<CompletionResult, CoreError> {
        if task.status == TaskStatus::Completed {
            return Err(CoreError::InvalidInput(format!(
                "Task '{}' is already completed",
                task.name
            )));
        }

        let draft = self.next_instance(&task, now);
        let completed = Task {
            status: TaskStatus::Completed,
            completed_at: Some(now),
            ..task
        };

        match draft {
            None => Ok(CompletionResult::Single(completed)),
            Some(data) => {
                let next = creator.create_task(data)?;
                info!(
                    completed = %completed.id,
                    next = %next.id,
                    due = ?next.plan_end_at,
                    "created next recurring instance"
                );
                Ok(CompletionResult::Recurring { completed, next })
            }
        }
    }
}
