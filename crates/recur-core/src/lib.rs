//! # Recur Core Library
//!
//! Deterministic evaluation of calendar recurrence rules for scheduled tasks.
//!
//! ## Features
//!
//! - **Interval Units**: minute through year, including quarters and half-years
//! - **Weekly Patterns**: any set of weekdays, with week-level intervals
//! - **Monthly Patterns**: a specific day of the month (clamped to short months)
//!   or the first, second, third, fourth or last occurrence of a weekday
//! - **Adjustments**: date conditions and weekday shifts applied after each step
//! - **Termination**: an inclusive end date and an optional occurrence budget
//! - **Task Rescheduling**: drafts the next instance when a recurring task is
//!   completed, preserving range spans
//!
//! ## Core Modules
//!
//! - [`calendar`]: Weekday, week-of-month and day-category codecs
//! - [`rule`]: The validated recurrence rule and its builder
//! - [`recurrence`]: The engine, its resolvers and the occurrence iterator
//! - [`models`]: Task records and drafts
//! - [`reschedule`]: Completion of recurring tasks
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use recur_core::calendar::DayOfWeek;
//! use recur_core::recurrence::RecurrenceEngine;
//! use recur_core::rule::{IntervalUnit, RuleSpec};
//!
//! let rule = RuleSpec::new(IntervalUnit::Week)
//!     .on_days([DayOfWeek::Monday, DayOfWeek::Thursday])
//!     .build()
//!     .unwrap();
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let next = RecurrenceEngine::new().next_occurrence(monday, &rule);
//! assert_eq!(next.map(|d| d.date()), NaiveDate::from_ymd_opt(2024, 1, 4));
//! ```

pub mod calendar;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod reschedule;
pub mod rule;
