use chrono::{NaiveDate, NaiveDateTime};
use recur_core::calendar::{DayCategory, DayOfWeek, DaySelector, WeekOfMonth};
use recur_core::error::CoreError;
use recur_core::models::{CompletionResult, NewTaskData, Task, TaskStatus};
use recur_core::recurrence::{generate, RecurrenceEngine};
use recur_core::reschedule::{TaskCreator, TaskRescheduler};
use recur_core::rule::{
    DateRelation, Direction, IntervalUnit, MonthlyPattern, RecurrenceRule, RuleSpec,
    ShiftTarget, WeekdayCondition,
};
use std::cell::RefCell;

/// Helper function to build a datetime at 09:00
fn at_nine(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// In-memory task store standing in for a repository
#[derive(Default)]
struct InMemoryStore {
    tasks: RefCell<Vec<Task>>,
}

impl TaskCreator for InMemoryStore {
    fn create_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let task = data.into_task();
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }
}

#[test]
fn test_rule_file_to_preview_workflow() {
    let rule = RecurrenceRule::from_json(
        r#"{
            "unit": "month",
            "monthly_pattern": { "kind": "nth_weekday", "position": "second", "weekday": "sunday" },
            "end_date": "2024-06-30"
        }"#,
    )
    .expect("Failed to parse rule");

    let dates: Vec<NaiveDate> = RecurrenceEngine::new()
        .preview(at_nine(2024, 1, 14), &rule, 12)
        .into_iter()
        .map(|d| d.date())
        .collect();

    assert_eq!(
        dates,
        vec![
            date(2024, 2, 11),
            date(2024, 3, 10),
            date(2024, 4, 14),
            date(2024, 5, 12),
            date(2024, 6, 9),
        ]
    );
}

#[test]
fn test_payday_rule_moves_off_weekends() {
    // Last day of the month, pulled back to the previous workday.
    let rule = RuleSpec::new(IntervalUnit::Month)
        .monthly(MonthlyPattern::SpecificDay { day: 31 })
        .weekday_condition(WeekdayCondition {
            if_day: DaySelector::Category(DayCategory::Weekend),
            direction: Direction::Previous,
            target: ShiftTarget::Category {
                category: DayCategory::Workday,
            },
        })
        .build()
        .expect("Failed to build rule");

    let dates: Vec<NaiveDate> = generate(at_nine(2024, 1, 31), &rule, 5)
        .map(|d| d.date())
        .collect();

    assert_eq!(
        dates,
        vec![
            date(2024, 2, 29), // Thursday
            date(2024, 3, 29), // Friday
            date(2024, 4, 30), // Tuesday
            date(2024, 5, 31), // Friday
            date(2024, 6, 28), // June 30 is a Sunday
        ]
    );
}

#[test]
fn test_date_condition_postpones_start() {
    let rule = RuleSpec::new(IntervalUnit::Week)
        .on_days([DayOfWeek::Tuesday])
        .date_condition(DateRelation::Before, date(2024, 3, 1))
        .build()
        .expect("Failed to build rule");

    let engine = RecurrenceEngine::new();
    assert_eq!(
        engine.next_occurrence(at_nine(2024, 1, 1), &rule),
        Some(at_nine(2024, 3, 1))
    );
    assert_eq!(
        engine.next_occurrence(at_nine(2024, 3, 4), &rule),
        Some(at_nine(2024, 3, 5))
    );
}

#[test]
fn test_last_weekday_across_year_boundary() {
    let rule = RuleSpec::new(IntervalUnit::Month)
        .monthly(MonthlyPattern::NthWeekday {
            position: WeekOfMonth::Last,
            weekday: DayOfWeek::Friday,
        })
        .build()
        .expect("Failed to build rule");

    let dates: Vec<NaiveDate> = generate(at_nine(2023, 11, 24), &rule, 3)
        .map(|d| d.date())
        .collect();
    assert_eq!(dates, vec![date(2023, 12, 29), date(2024, 1, 26), date(2024, 2, 23)]);
}

#[test]
fn test_completing_a_series_until_it_ends() {
    let store = InMemoryStore::default();
    let rescheduler = TaskRescheduler::new();
    let rule = RuleSpec::new(IntervalUnit::Week)
        .on_days([DayOfWeek::Monday, DayOfWeek::Friday])
        .max_occurrences(4)
        .build()
        .expect("Failed to build rule");

    let mut current = Task {
        name: "Gym".to_string(),
        plan_end_at: Some(at_nine(2024, 1, 1)),
        recurrence: Some(rule),
        tags: vec!["health".to_string()],
        ..Default::default()
    };

    let mut due_dates = vec![current.plan_end_at];
    loop {
        let now = current.plan_end_at.expect("planned task");
        match rescheduler
            .complete(current, now, &store)
            .expect("Failed to complete task")
        {
            CompletionResult::Recurring { completed, next } => {
                assert_eq!(completed.status, TaskStatus::Completed);
                assert_eq!(next.recurs_from, Some(completed.id));
                due_dates.push(next.plan_end_at);
                current = next;
            }
            CompletionResult::Single(last) => {
                assert_eq!(last.occurrence_index, 4);
                break;
            }
        }
    }

    assert_eq!(
        due_dates,
        vec![
            Some(at_nine(2024, 1, 1)),
            Some(at_nine(2024, 1, 5)),
            Some(at_nine(2024, 1, 8)),
            Some(at_nine(2024, 1, 12)),
        ]
    );
    assert_eq!(store.tasks.borrow().len(), 3);
    assert!(store.tasks.borrow().iter().all(|t| t.tags == ["health"]));
}

#[test]
fn test_range_task_keeps_its_span() {
    let store = InMemoryStore::default();
    let task = Task {
        name: "Conference".to_string(),
        plan_start_at: Some(at_nine(2024, 5, 13)),
        plan_end_at: Some(at_nine(2024, 5, 15)),
        is_range: true,
        recurrence: Some(RecurrenceRule::every(1, IntervalUnit::Year).expect("valid rule")),
        ..Default::default()
    };

    let result = TaskRescheduler::new()
        .complete(task, at_nine(2024, 5, 15), &store)
        .expect("Failed to complete task");

    let CompletionResult::Recurring { next, .. } = result else {
        panic!("Expected a successor");
    };
    assert_eq!(next.plan_start_at, Some(at_nine(2025, 5, 13)));
    assert_eq!(next.plan_end_at, Some(at_nine(2025, 5, 15)));
    assert!(next.is_range);
}

#[test]
fn test_invalid_rule_files_are_rejected() {
    let cases = [
        r#"{ "unit": "day", "interval": 0 }"#,
        r#"{ "unit": "day", "days_of_week": ["mon"] }"#,
        r#"{ "unit": "week", "monthly_pattern": { "kind": "specific_day", "day": 1 } }"#,
        r#"{ "unit": "month", "monthly_pattern": { "kind": "specific_day", "day": 32 } }"#,
        r#"{ "unit": "fortnight" }"#,
        r#"{ "unit": "day", "colour": "blue" }"#,
    ];

    for case in cases {
        assert!(
            RecurrenceRule::from_json(case).is_err(),
            "rule should be rejected: {}",
            case
        );
    }
}

#[test]
fn test_rule_survives_task_serialization() {
    let rule = RuleSpec::new(IntervalUnit::Month)
        .interval(2)
        .monthly(MonthlyPattern::NthWeekday {
            position: WeekOfMonth::First,
            weekday: DayOfWeek::Wednesday,
        })
        .until(date(2025, 1, 1))
        .build()
        .expect("Failed to build rule");
    let task = Task {
        name: "Board meeting".to_string(),
        plan_end_at: Some(at_nine(2024, 1, 3)),
        recurrence: Some(rule.clone()),
        ..Default::default()
    };

    let json = serde_json::to_string(&task).expect("Failed to serialize task");
    let restored: Task = serde_json::from_str(&json).expect("Failed to deserialize task");
    assert_eq!(restored.recurrence, Some(rule));
    assert_eq!(restored.id, task.id);
}
