//! Recurrence evaluation: from a base date and a rule to the next occurrence.
//!
//! The engine dispatches on the rule's unit to a resolver, pipes the raw date
//! through the rule's adjustment and finally applies the end-date boundary.
//! Every function here is pure; "no next occurrence" is `None`, never an error.

pub mod adjustment;
pub mod advance;
pub mod monthly;
pub mod sequence;
pub mod termination;
pub mod weekly;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::rule::{IntervalUnit, RecurrenceRule};

pub use sequence::{generate, Occurrences};

/// Stateless facade over the resolvers.
///
/// Holds no data, so it is free to copy and share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the occurrence that follows `base`.
    ///
    /// # Returns
    /// * `Some(date)` - the next occurrence, adjusted
    /// * `None` - the pattern has no date in the target period, or the
    ///   adjusted date lies past the rule's end date
    ///
    /// `max_occurrences` is not consulted here; see
    /// [`RecurrenceEngine::next_occurrence_counted`].
    pub fn next_occurrence(&self, base: NaiveDateTime, rule: &RecurrenceRule) -> Option<NaiveDateTime> {
        let raw = match rule.unit() {
            IntervalUnit::Minute
            | IntervalUnit::Hour
            | IntervalUnit::Day
            | IntervalUnit::Quarter
            | IntervalUnit::HalfYear
            | IntervalUnit::Year => advance::advance(base, rule.unit(), rule.interval()),
            IntervalUnit::Week => weekly::resolve(base, rule),
            IntervalUnit::Month => monthly::resolve(base, rule),
        };

        let Some(raw) = raw else {
            debug!(%base, unit = %rule.unit(), "no occurrence in target period");
            return None;
        };

        let adjusted = match rule.adjustment() {
            Some(adjustment) => adjustment::apply(raw, adjustment)?,
            None => raw,
        };

        if termination::is_exhausted(adjusted, rule) {
            debug!(%base, %adjusted, end_date = ?rule.end_date(), "recurrence exhausted");
            return None;
        }

        debug!(%base, %raw, %adjusted, "next occurrence resolved");
        Some(adjusted)
    }

    /// Like [`RecurrenceEngine::next_occurrence`], but also enforces the
    /// rule's occurrence budget.
    ///
    /// `produced` is the number of occurrences that already exist, the one at
    /// `base` included. Counting is the caller's job; the engine keeps no state.
    pub fn next_occurrence_counted(
        &self,
        base: NaiveDateTime,
        rule: &RecurrenceRule,
        produced: u32,
    ) -> Option<NaiveDateTime> {
        if termination::is_spent(rule, produced) {
            debug!(produced, max = ?rule.max_occurrences(), "occurrence budget spent");
            return None;
        }
        self.next_occurrence(base, rule)
    }

    /// Lazy sequence of up to `max_count` occurrences after `start`.
    pub fn occurrences<'a>(
        &self,
        start: NaiveDateTime,
        rule: &'a RecurrenceRule,
        max_count: usize,
    ) -> Occurrences<'a> {
        Occurrences::new(*self, start, rule, max_count)
    }

    /// Collects the next `count` occurrences after `from` for display.
    pub fn preview(&self, from: NaiveDateTime, rule: &RecurrenceRule, count: usize) -> Vec<NaiveDateTime> {
        self.occurrences(from, rule, count).collect()
    }
}

/// Shorthand for [`RecurrenceEngine::next_occurrence`].
pub fn next_occurrence(base: NaiveDateTime, rule: &RecurrenceRule) -> Option<NaiveDateTime> {
    RecurrenceEngine.next_occurrence(base, rule)
}
