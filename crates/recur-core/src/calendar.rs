//! Calendar vocabulary shared by rules and resolvers.
//!
//! Symbolic weekday and week-of-month names are mapped to the integer
//! encodings the resolvers work with: weekdays are indexed `0 = Sunday` to
//! `6 = Saturday`, week positions `first = 1` to `fourth = 4` and `last = -1`.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A day of the week, ordered Sunday first so that sorted sets follow index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid day of week: {0}")]
pub struct ParseDayOfWeekError(String);

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Index with `0 = Sunday` .. `6 = Saturday`.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Weekday of a calendar date.
    #[inline]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn short_name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sun",
            DayOfWeek::Monday => "Mon",
            DayOfWeek::Tuesday => "Tue",
            DayOfWeek::Wednesday => "Wed",
            DayOfWeek::Thursday => "Thu",
            DayOfWeek::Friday => "Fri",
            DayOfWeek::Saturday => "Sat",
        }
    }

    pub fn category(self) -> DayCategory {
        match self {
            DayOfWeek::Saturday | DayOfWeek::Sunday => DayCategory::Weekend,
            _ => DayCategory::Workday,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Sunday => Weekday::Sun,
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = ParseDayOfWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" | "su" => Ok(DayOfWeek::Sunday),
            "monday" | "mon" | "mo" => Ok(DayOfWeek::Monday),
            "tuesday" | "tue" | "tu" => Ok(DayOfWeek::Tuesday),
            "wednesday" | "wed" | "we" => Ok(DayOfWeek::Wednesday),
            "thursday" | "thu" | "th" => Ok(DayOfWeek::Thursday),
            "friday" | "fri" | "fr" => Ok(DayOfWeek::Friday),
            "saturday" | "sat" | "sa" => Ok(DayOfWeek::Saturday),
            _ => Err(ParseDayOfWeekError(s.to_string())),
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = ParseDayOfWeekError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayOfWeek> for String {
    fn from(day: DayOfWeek) -> Self {
        day.to_string()
    }
}

/// Position of a weekday within its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid week of month: {0}")]
pub struct ParseWeekOfMonthError(String);

impl WeekOfMonth {
    /// Ordinal with `first = 1` .. `fourth = 4` and `last = -1`.
    pub fn ordinal(self) -> i8 {
        match self {
            WeekOfMonth::First => 1,
            WeekOfMonth::Second => 2,
            WeekOfMonth::Third => 3,
            WeekOfMonth::Fourth => 4,
            WeekOfMonth::Last => -1,
        }
    }
}

impl FromStr for WeekOfMonth {
    type Err = ParseWeekOfMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1st" | "1" => Ok(WeekOfMonth::First),
            "second" | "2nd" | "2" => Ok(WeekOfMonth::Second),
            "third" | "3rd" | "3" => Ok(WeekOfMonth::Third),
            "fourth" | "4th" | "4" => Ok(WeekOfMonth::Fourth),
            "last" | "-1" => Ok(WeekOfMonth::Last),
            _ => Err(ParseWeekOfMonthError(s.to_string())),
        }
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeekOfMonth::First => "first",
            WeekOfMonth::Second => "second",
            WeekOfMonth::Third => "third",
            WeekOfMonth::Fourth => "fourth",
            WeekOfMonth::Last => "last",
        };
        f.write_str(name)
    }
}

impl TryFrom<String> for WeekOfMonth {
    type Error = ParseWeekOfMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekOfMonth> for String {
    fn from(position: WeekOfMonth) -> Self {
        position.to_string()
    }
}

/// Workday (Monday to Friday) or weekend (Saturday, Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Workday,
    Weekend,
}

impl DayCategory {
    #[inline]
    pub fn contains(self, day: DayOfWeek) -> bool {
        day.category() == self
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCategory::Workday => write!(f, "workday"),
            DayCategory::Weekend => write!(f, "weekend"),
        }
    }
}

/// Matches either one weekday or a whole category of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DaySelector {
    Day(DayOfWeek),
    Category(DayCategory),
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid day selector: {0}")]
pub struct ParseDaySelectorError(String);

impl DaySelector {
    pub fn matches(self, day: DayOfWeek) -> bool {
        match self {
            DaySelector::Day(expected) => expected == day,
            DaySelector::Category(category) => category.contains(day),
        }
    }
}

impl FromStr for DaySelector {
    type Err = ParseDaySelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workday" | "weekday" => Ok(DaySelector::Category(DayCategory::Workday)),
            "weekend" => Ok(DaySelector::Category(DayCategory::Weekend)),
            other => other
                .parse::<DayOfWeek>()
                .map(DaySelector::Day)
                .map_err(|_| ParseDaySelectorError(s.to_string())),
        }
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySelector::Day(day) => write!(f, "{}", day),
            DaySelector::Category(category) => write!(f, "{}", category),
        }
    }
}

impl TryFrom<String> for DaySelector {
    type Error = ParseDaySelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DaySelector> for String {
    fn from(selector: DaySelector) -> Self {
        selector.to_string()
    }
}

// ============================================================================
// Month arithmetic
// ============================================================================

/// First day of the month `months` after the month containing `date`.
pub(crate) fn first_of_month_after(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(months))
}

/// Number of days in the month containing `first_of_month`.
pub(crate) fn days_in_month(first_of_month: NaiveDate) -> Option<u32> {
    let next = first_of_month.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first_of_month).num_days() as u32)
}

/// Adds calendar months, clamping the day to the length of the target month.
pub(crate) fn add_months(date: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    date.checked_add_months(Months::new(months))
}
