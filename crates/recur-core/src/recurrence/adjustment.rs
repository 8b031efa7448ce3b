use chrono::{Duration, NaiveDateTime};
use tracing::trace;

use crate::calendar::{DayCategory, DayOfWeek};
use crate::rule::{Adjustment, DateCondition, DateRelation, Direction, ShiftTarget, WeekdayCondition};

/// Folds the adjustment's conditions over `date`, date conditions first.
///
/// Every condition sees the output of the previous one. Returns `None` only if
/// a shift leaves chrono's representable range.
pub fn apply(date: NaiveDateTime, adjustment: &Adjustment) -> Option<NaiveDateTime> {
    let date = adjustment
        .date_conditions
        .iter()
        .try_fold(date, |current, condition| apply_date_condition(current, condition))?;

    adjustment
        .weekday_conditions
        .iter()
        .try_fold(date, |current, condition| apply_weekday_condition(current, condition))
}

/// Moves `date` forward when it stands in the condition's relation to the
/// reference date.
///
/// `before` and `on_or_before` land on the first day that no longer matches.
/// `on_or_after` and `after` cannot be escaped by moving forward, so they
/// shift by a single day.
fn apply_date_condition(date: NaiveDateTime, condition: &DateCondition) -> Option<NaiveDateTime> {
    if !condition.relation.holds(date.date(), condition.reference_date) {
        return Some(date);
    }

    let shifted = match condition.relation {
        DateRelation::Before => condition.reference_date.and_time(date.time()),
        DateRelation::OnOrBefore => condition.reference_date.succ_opt()?.and_time(date.time()),
        DateRelation::OnOrAfter | DateRelation::After => {
            date.checked_add_signed(Duration::days(1))?
        }
    };
    trace!(%date, %shifted, relation = %condition.relation, "date condition applied");
    Some(shifted)
}

fn apply_weekday_condition(date: NaiveDateTime, condition: &WeekdayCondition) -> Option<NaiveDateTime> {
    let day = DayOfWeek::of(date.date());
    if !condition.if_day.matches(day) {
        return Some(date);
    }

    let delta = match condition.target {
        ShiftTarget::SpecificWeekday { weekday } => weekday_delta(day, weekday, condition.direction),
        ShiftTarget::DaysOffset { days } => match condition.direction {
            Direction::Next => i64::from(days),
            Direction::Previous => -i64::from(days),
        },
        ShiftTarget::Category { category } => category_delta(day, category, condition.direction),
    };

    let shifted = date.checked_add_signed(Duration::days(delta))?;
    trace!(%date, %shifted, if_day = %condition.if_day, "weekday condition applied");
    Some(shifted)
}

/// Signed distance to `to` in `direction`, 1 to 7 days, never 0.
fn weekday_delta(from: DayOfWeek, to: DayOfWeek, direction: Direction) -> i64 {
    let (from, to) = (i64::from(from.index()), i64::from(to.index()));
    let forward = |distance: i64| if distance == 0 { 7 } else { distance };
    match direction {
        Direction::Next => forward((to - from).rem_euclid(7)),
        Direction::Previous => -forward((from - to).rem_euclid(7)),
    }
}

/// Signed distance to the nearest day of `category` in `direction`.
fn category_delta(from: DayOfWeek, category: DayCategory, direction: Direction) -> i64 {
    let step = match direction {
        Direction::Next => 1,
        Direction::Previous => -1,
    };
    (1..=7)
        .map(|distance| distance * step)
        .find(|&delta| category.contains(day_after(from, delta)))
        .unwrap_or(7 * step)
}

fn day_after(from: DayOfWeek, delta: i64) -> DayOfWeek {
    let index = (i64::from(from.index()) + delta).rem_euclid(7);
    DayOfWeek::ALL[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DaySelector;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(9, 30, 0).unwrap()
    }

    fn with_dates(conditions: &[(DateRelation, NaiveDate)]) -> Adjustment {
        Adjustment {
            date_conditions: conditions
                .iter()
                .map(|&(relation, reference_date)| DateCondition { relation, reference_date })
                .collect(),
            weekday_conditions: Vec::new(),
        }
    }

    fn with_weekdays(conditions: &[WeekdayCondition]) -> Adjustment {
        Adjustment {
            date_conditions: Vec::new(),
            weekday_conditions: conditions.to_vec(),
        }
    }

    mod date_condition_tests {
        use super::*;

        #[rstest]
        // Before: jumps to the reference date
        #[case(DateRelation::Before, day(2024, 1, 3), day(2024, 1, 10))]
        #[case(DateRelation::Before, day(2024, 1, 10), day(2024, 1, 10))]
        // On or before: jumps to the day after the reference
        #[case(DateRelation::OnOrBefore, day(2024, 1, 10), day(2024, 1, 11))]
        #[case(DateRelation::OnOrBefore, day(2024, 1, 11), day(2024, 1, 11))]
        // After-relations shift a single day
        #[case(DateRelation::OnOrAfter, day(2024, 1, 10), day(2024, 1, 11))]
        #[case(DateRelation::OnOrAfter, day(2024, 1, 9), day(2024, 1, 9))]
        #[case(DateRelation::After, day(2024, 1, 20), day(2024, 1, 21))]
        #[case(DateRelation::After, day(2024, 1, 10), day(2024, 1, 10))]
        fn test_relations(
            #[case] relation: DateRelation,
            #[case] candidate: NaiveDateTime,
            #[case] expected: NaiveDateTime,
        ) {
            let adjustment = with_dates(&[(relation, date(2024, 1, 10))]);
            assert_eq!(apply(candidate, &adjustment), Some(expected));
        }

        #[test]
        fn test_conditions_compose_in_order() {
            let adjustment = with_dates(&[
                (DateRelation::Before, date(2024, 1, 10)),
                (DateRelation::OnOrAfter, date(2024, 1, 10)),
            ]);
            assert_eq!(apply(day(2024, 1, 1), &adjustment), Some(day(2024, 1, 11)));
        }
    }

    mod weekday_condition_tests {
        use super::*;

        fn condition(if_day: DaySelector, direction: Direction, target: ShiftTarget) -> WeekdayCondition {
            WeekdayCondition { if_day, direction, target }
        }

        #[rstest]
        // 2024-01-06 is a Saturday
        #[case(Direction::Next, DayOfWeek::Monday, day(2024, 1, 8))]
        #[case(Direction::Previous, DayOfWeek::Friday, day(2024, 1, 5))]
        #[case(Direction::Next, DayOfWeek::Saturday, day(2024, 1, 13))]
        #[case(Direction::Previous, DayOfWeek::Saturday, day(2023, 12, 30))]
        #[case(Direction::Previous, DayOfWeek::Sunday, day(2023, 12, 31))]
        fn test_specific_weekday_target(
            #[case] direction: Direction,
            #[case] weekday: DayOfWeek,
            #[case] expected: NaiveDateTime,
        ) {
            let adjustment = with_weekdays(&[condition(
                DaySelector::Day(DayOfWeek::Saturday),
                direction,
                ShiftTarget::SpecificWeekday { weekday },
            )]);
            assert_eq!(apply(day(2024, 1, 6), &adjustment), Some(expected));
        }

        #[rstest]
        #[case(Direction::Next, day(2024, 1, 9))]
        #[case(Direction::Previous, day(2024, 1, 3))]
        fn test_days_offset_target(#[case] direction: Direction, #[case] expected: NaiveDateTime) {
            let adjustment = with_weekdays(&[condition(
                DaySelector::Day(DayOfWeek::Saturday),
                direction,
                ShiftTarget::DaysOffset { days: 3 },
            )]);
            assert_eq!(apply(day(2024, 1, 6), &adjustment), Some(expected));
        }

        #[rstest]
        // Saturday and Sunday both move to Monday 2024-01-08
        #[case(day(2024, 1, 6), Direction::Next, day(2024, 1, 8))]
        #[case(day(2024, 1, 7), Direction::Next, day(2024, 1, 8))]
        // ... or back to Friday 2024-01-05
        #[case(day(2024, 1, 6), Direction::Previous, day(2024, 1, 5))]
        #[case(day(2024, 1, 7), Direction::Previous, day(2024, 1, 5))]
        fn test_weekend_to_workday(
            #[case] candidate: NaiveDateTime,
            #[case] direction: Direction,
            #[case] expected: NaiveDateTime,
        ) {
            let adjustment = with_weekdays(&[condition(
                DaySelector::Category(DayCategory::Weekend),
                direction,
                ShiftTarget::Category { category: DayCategory::Workday },
            )]);
            assert_eq!(apply(candidate, &adjustment), Some(expected));
        }

        #[test]
        fn test_category_target_always_moves() {
            // A workday asked to move to the next workday still moves.
            let adjustment = with_weekdays(&[condition(
                DaySelector::Day(DayOfWeek::Tuesday),
                Direction::Next,
                ShiftTarget::Category { category: DayCategory::Workday },
            )]);
            assert_eq!(apply(day(2024, 1, 2), &adjustment), Some(day(2024, 1, 3)));
        }

        #[test]
        fn test_non_matching_day_is_untouched() {
            let adjustment = with_weekdays(&[condition(
                DaySelector::Category(DayCategory::Weekend),
                Direction::Next,
                ShiftTarget::DaysOffset { days: 1 },
            )]);
            assert_eq!(apply(day(2024, 1, 3), &adjustment), Some(day(2024, 1, 3)));
        }

        #[test]
        fn test_chained_conditions_see_previous_output() {
            // Saturday -> +1 day (Sunday) -> Sunday rule moves to Monday.
            let adjustment = with_weekdays(&[
                condition(
                    DaySelector::Day(DayOfWeek::Saturday),
                    Direction::Next,
                    ShiftTarget::DaysOffset { days: 1 },
                ),
                condition(
                    DaySelector::Day(DayOfWeek::Sunday),
                    Direction::Next,
                    ShiftTarget::SpecificWeekday { weekday: DayOfWeek::Monday },
                ),
            ]);
            assert_eq!(apply(day(2024, 1, 6), &adjustment), Some(day(2024, 1, 8)));
        }

        #[test]
        fn test_date_conditions_run_before_weekday_conditions() {
            let adjustment = Adjustment {
                date_conditions: vec![DateCondition {
                    relation: DateRelation::Before,
                    reference_date: date(2024, 1, 6),
                }],
                weekday_conditions: vec![condition(
                    DaySelector::Category(DayCategory::Weekend),
                    Direction::Next,
                    ShiftTarget::Category { category: DayCategory::Workday },
                )],
            };
            // Jan 2 -> Jan 6 (Saturday) -> Monday Jan 8
            assert_eq!(apply(day(2024, 1, 2), &adjustment), Some(day(2024, 1, 8)));
        }
    }
}
