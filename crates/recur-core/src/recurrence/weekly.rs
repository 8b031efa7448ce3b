use chrono::{Duration, NaiveDateTime};

use super::advance::advance;
use crate::calendar::DayOfWeek;
use crate::rule::{IntervalUnit, RecurrenceRule};

/// Next date for a `week` rule.
///
/// Without a day set this is a plain `interval`-week cadence. With one, a
/// later target day in the current week wins (the smallest such index);
/// otherwise the rule jumps `interval` weeks ahead to the smallest target
/// index. Weeks run Sunday (0) to Saturday (6).
pub fn resolve(base: NaiveDateTime, rule: &RecurrenceRule) -> Option<NaiveDateTime> {
    let Some(days) = rule.days_of_week() else {
        return advance(base, IntervalUnit::Week, rule.interval());
    };

    let current = i64::from(DayOfWeek::of(base.date()).index());
    let later_this_week = days
        .iter()
        .map(|d| i64::from(d.index()))
        .find(|&target| target > current);

    let offset = match later_this_week {
        Some(target) => target - current,
        None => {
            let first = i64::from(days.iter().next()?.index());
            i64::from(rule.interval()) * 7 + first - current
        }
    };

    base.checked_add_signed(Duration::days(offset))
}
