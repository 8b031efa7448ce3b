use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::rule::RecurrenceRule;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_started" | "todo" => Ok(TaskStatus::NotStarted),
            "in_progress" | "doing" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::NotStarted => write!(f, "not_started"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// The slice of a task record the recurrence boundary needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub plan_start_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub plan_end_at: Option<NaiveDateTime>,
    /// Scheduled by a start/end pair rather than a single due date
    #[serde(default)]
    pub is_range: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    /// 1-based position of this instance within its recurring series
    #[serde(default = "first_occurrence")]
    pub occurrence_index: u32,
    /// Task this instance was spawned from, if any
    #[serde(default)]
    pub recurs_from: Option<Uuid>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn first_occurrence() -> u32 {
    1
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            name: "".to_string(),
            description: None,
            status: TaskStatus::NotStarted,
            plan_start_at: None,
            plan_end_at: None,
            is_range: false,
            recurrence: None,
            occurrence_index: first_occurrence(),
            recurs_from: None,
            completed_at: None,
            project_id: None,
            tags: Vec::new(),
        }
    }
}

/// Draft of a task instance, handed to the task-creation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTaskData {
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub plan_start_at: Option<NaiveDateTime>,
    pub plan_end_at: Option<NaiveDateTime>,
    pub is_range: bool,
    pub recurrence: Option<RecurrenceRule>,
    pub occurrence_index: u32,
    pub recurs_from: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub tags: Vec<String>,
}

impl NewTaskData {
    /// Materializes the draft under a fresh id.
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::now_v7(),
            name: self.name,
            description: self.description,
            status: self.status,
            plan_start_at: self.plan_start_at,
            plan_end_at: self.plan_end_at,
            is_range: self.is_range,
            recurrence: self.recurrence,
            occurrence_index: self.occurrence_index,
            recurs_from: self.recurs_from,
            completed_at: None,
            project_id: self.project_id,
            tags: self.tags,
        }
    }
}

#[derive(Debug)]
pub enum CompletionResult {
    Single(Task),
    Recurring { completed: Task, next: Task },
}

impl CompletionResult {
    pub fn completed(&self) -> &Task {
        match self {
            CompletionResult::Single(task) => task,
            CompletionResult::Recurring { completed, .. } => completed,
        }
    }
}
