use chrono::{Duration, NaiveDateTime};

use crate::calendar::add_months;
use crate::rule::IntervalUnit;

/// Adds `interval` units to `date`.
///
/// Minutes, hours, days and weeks are fixed-length; month-based units clamp
/// the day to the length of the target month (Jan 31 + 1 month = Feb 28/29,
/// Feb 29 + 1 year = Feb 28). Returns `None` only when the result falls outside
/// chrono's representable range.
pub fn advance(date: NaiveDateTime, unit: IntervalUnit, interval: u32) -> Option<NaiveDateTime> {
    let count = i64::from(interval);
    match unit {
        IntervalUnit::Minute => date.checked_add_signed(Duration::minutes(count)),
        IntervalUnit::Hour => date.checked_add_signed(Duration::hours(count)),
        IntervalUnit::Day => date.checked_add_signed(Duration::days(count)),
        IntervalUnit::Week => date.checked_add_signed(Duration::days(count * 7)),
        IntervalUnit::Month => add_months(date, interval),
        IntervalUnit::Quarter => add_months(date, interval.checked_mul(3)?),
        IntervalUnit::HalfYear => add_months(date, interval.checked_mul(6)?),
        IntervalUnit::Year => add_months(date, interval.checked_mul(12)?),
    }
}
