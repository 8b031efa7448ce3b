use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::calendar::{days_in_month, first_of_month_after, DayOfWeek, WeekOfMonth};
use crate::rule::{MonthlyPattern, RecurrenceRule};

/// Next date for a `month` rule, `interval` months after `base`.
///
/// A rule without a pattern repeats on the base date's day of month. `None`
/// means the pattern has no date in the target month.
pub fn resolve(base: NaiveDateTime, rule: &RecurrenceRule) -> Option<NaiveDateTime> {
    let pattern = rule
        .monthly_pattern()
        .unwrap_or(MonthlyPattern::SpecificDay { day: base.day() });
    let target_month = first_of_month_after(base.date(), rule.interval())?;

    let date = match pattern {
        MonthlyPattern::SpecificDay { day } => specific_day(target_month, day),
        MonthlyPattern::NthWeekday {
            position: WeekOfMonth::Last,
            weekday,
        } => last_weekday(target_month, weekday),
        MonthlyPattern::NthWeekday { position, weekday } => {
            nth_weekday(target_month, position, weekday)
        }
    }?;

    Some(date.and_time(base.time()))
}

/// `day` of the month, clamped to the month's last day.
fn specific_day(first_of_month: NaiveDate, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(first_of_month)?;
    first_of_month.with_day(day.min(last))
}

fn nth_weekday(first_of_month: NaiveDate, position: WeekOfMonth, weekday: DayOfWeek) -> Option<NaiveDate> {
    let n = u8::try_from(position.ordinal()).ok()?;
    NaiveDate::from_weekday_of_month_opt(
        first_of_month.year(),
        first_of_month.month(),
        weekday.into(),
        n,
    )
}

fn last_weekday(first_of_month: NaiveDate, weekday: DayOfWeek) -> Option<NaiveDate> {
    let last = first_of_month.with_day(days_in_month(first_of_month)?)?;
    let back = (i64::from(DayOfWeek::of(last).index()) - i64::from(weekday.index())).rem_euclid(7);
    last.checked_sub_signed(Duration::days(back))
}
