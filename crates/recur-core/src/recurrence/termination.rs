use chrono::NaiveDateTime;

use crate::rule::RecurrenceRule;

/// True when `date` falls after the rule's end date.
///
/// Compared at day resolution, so any time on the end date itself is still
/// a valid occurrence.
#[inline]
pub fn is_exhausted(date: NaiveDateTime, rule: &RecurrenceRule) -> bool {
    rule.end_date().is_some_and(|end| date.date() > end)
}

/// True when `produced` occurrences already use up the rule's budget.
#[inline]
pub fn is_spent(rule: &RecurrenceRule, produced: u32) -> bool {
    rule.max_occurrences().is_some_and(|max| produced >= max)
}
