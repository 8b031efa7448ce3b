use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::calendar::{DayCategory, DayOfWeek, DaySelector, WeekOfMonth};
use crate::error::CoreError;

/// Unit of the interval between two occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid interval unit: {0}")]
pub struct ParseIntervalUnitError(String);

impl FromStr for IntervalUnit {
    type Err = ParseIntervalUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" | "minutes" => Ok(IntervalUnit::Minute),
            "hour" | "hours" => Ok(IntervalUnit::Hour),
            "day" | "days" | "daily" => Ok(IntervalUnit::Day),
            "week" | "weeks" | "weekly" => Ok(IntervalUnit::Week),
            "month" | "months" | "monthly" => Ok(IntervalUnit::Month),
            "quarter" | "quarters" | "quarterly" => Ok(IntervalUnit::Quarter),
            "half_year" | "half-year" | "halfyear" => Ok(IntervalUnit::HalfYear),
            "year" | "years" | "yearly" => Ok(IntervalUnit::Year),
            _ => Err(ParseIntervalUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalUnit::Minute => write!(f, "minute"),
            IntervalUnit::Hour => write!(f, "hour"),
            IntervalUnit::Day => write!(f, "day"),
            IntervalUnit::Week => write!(f, "week"),
            IntervalUnit::Month => write!(f, "month"),
            IntervalUnit::Quarter => write!(f, "quarter"),
            IntervalUnit::HalfYear => write!(f, "half_year"),
            IntervalUnit::Year => write!(f, "year"),
        }
    }
}

/// Day selection for month-based rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthlyPattern {
    /// Fixed day of the month, clamped to the month's last day.
    SpecificDay { day: u32 },
    /// "Second Sunday", "last Friday" and the like.
    NthWeekday {
        position: WeekOfMonth,
        weekday: DayOfWeek,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRelation {
    Before,
    OnOrBefore,
    OnOrAfter,
    After,
}

impl DateRelation {
    pub fn holds(self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self {
            DateRelation::Before => date < reference,
            DateRelation::OnOrBefore => date <= reference,
            DateRelation::OnOrAfter => date >= reference,
            DateRelation::After => date > reference,
        }
    }
}

impl fmt::Display for DateRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRelation::Before => write!(f, "before"),
            DateRelation::OnOrBefore => write!(f, "on or before"),
            DateRelation::OnOrAfter => write!(f, "on or after"),
            DateRelation::After => write!(f, "after"),
        }
    }
}

/// Shifts the candidate when it stands in `relation` to `reference_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCondition {
    pub relation: DateRelation,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ShiftTarget {
    /// Move to the given weekday, always by 1 to 7 days.
    SpecificWeekday { weekday: DayOfWeek },
    /// Move by a fixed number of days.
    DaysOffset { days: u32 },
    /// Move to the nearest day of the category, always by 1 to 7 days.
    Category { category: DayCategory },
}

/// "If the candidate falls on `if_day`, move it `direction` to `target`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCondition {
    pub if_day: DaySelector,
    pub direction: Direction,
    #[serde(flatten)]
    pub target: ShiftTarget,
}

/// Post-processing applied to a raw occurrence, date conditions first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_conditions: Vec<DateCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_conditions: Vec<WeekdayCondition>,
}

impl Adjustment {
    pub fn is_empty(&self) -> bool {
        self.date_conditions.is_empty() && self.weekday_conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.date_conditions.len() + self.weekday_conditions.len()
    }
}

// ============================================================================
// Rule construction
// ============================================================================

/// Unvalidated rule as it appears in rule files, doubling as a builder.
///
/// Turn it into a [`RecurrenceRule`] with [`RuleSpec::build`]; every invariant
/// of the rule is checked there, never during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub unit: IntervalUnit,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_pattern: Option<MonthlyPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_occurrences: Option<u32>,
}

fn default_interval() -> i64 {
    1
}

impl RuleSpec {
    pub fn new(unit: IntervalUnit) -> Self {
        Self {
            unit,
            interval: default_interval(),
            days_of_week: Vec::new(),
            monthly_pattern: None,
            adjustment: None,
            end_date: None,
            max_occurrences: None,
        }
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.interval = interval;
        self
    }

    pub fn on_days(mut self, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        self.days_of_week = days.into_iter().collect();
        self
    }

    pub fn monthly(mut self, pattern: MonthlyPattern) -> Self {
        self.monthly_pattern = Some(pattern);
        self
    }

    pub fn date_condition(mut self, relation: DateRelation, reference_date: NaiveDate) -> Self {
        self.adjustment
            .get_or_insert_with(Adjustment::default)
            .date_conditions
            .push(DateCondition { relation, reference_date });
        self
    }

    pub fn weekday_condition(mut self, condition: WeekdayCondition) -> Self {
        self.adjustment
            .get_or_insert_with(Adjustment::default)
            .weekday_conditions
            .push(condition);
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn max_occurrences(mut self, max: u32) -> Self {
        self.max_occurrences = Some(max);
        self
    }

    pub fn build(self) -> Result<RecurrenceRule, CoreError> {
        RecurrenceRule::try_from(self)
    }
}

/// A validated recurrence rule.
///
/// Only obtainable through [`RuleSpec::build`] (or deserialization, which goes
/// through the same checks), so evaluation can rely on:
/// - `interval >= 1`
/// - a weekly day set only on week rules, and never an empty one
/// - a monthly pattern only on month rules, with `SpecificDay` in `1..=31`
/// - `max_occurrences >= 1` and `days_offset >= 1` when present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct RecurrenceRule {
    unit: IntervalUnit,
    interval: u32,
    days_of_week: Option<BTreeSet<DayOfWeek>>,
    monthly_pattern: Option<MonthlyPattern>,
    adjustment: Option<Adjustment>,
    end_date: Option<NaiveDate>,
    max_occurrences: Option<u32>,
}

impl RecurrenceRule {
    pub fn builder(unit: IntervalUnit) -> RuleSpec {
        RuleSpec::new(unit)
    }

    /// Plain "every `interval` `unit`s" rule.
    pub fn every(interval: u32, unit: IntervalUnit) -> Result<Self, CoreError> {
        RuleSpec::new(unit).interval(i64::from(interval)).build()
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn unit(&self) -> IntervalUnit {
        self.unit
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn days_of_week(&self) -> Option<&BTreeSet<DayOfWeek>> {
        self.days_of_week.as_ref()
    }

    pub fn monthly_pattern(&self) -> Option<MonthlyPattern> {
        self.monthly_pattern
    }

    pub fn adjustment(&self) -> Option<&Adjustment> {
        self.adjustment.as_ref()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn max_occurrences(&self) -> Option<u32> {
        self.max_occurrences
    }
}

impl TryFrom<RuleSpec> for RecurrenceRule {
    type Error = CoreError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        if spec.interval < 1 {
            return Err(CoreError::InvalidRule(format!(
                "interval must be at least 1, got {}",
                spec.interval
            )));
        }
        let interval = u32::try_from(spec.interval).map_err(|_| {
            CoreError::InvalidRule(format!("interval {} is too large", spec.interval))
        })?;

        if !spec.days_of_week.is_empty() && spec.unit != IntervalUnit::Week {
            return Err(CoreError::InvalidRule(format!(
                "days_of_week requires unit 'week', got '{}'",
                spec.unit
            )));
        }

        match spec.monthly_pattern {
            Some(_) if spec.unit != IntervalUnit::Month => {
                return Err(CoreError::InvalidRule(format!(
                    "monthly_pattern requires unit 'month', got '{}'",
                    spec.unit
                )));
            }
            Some(MonthlyPattern::SpecificDay { day }) if !(1..=31).contains(&day) => {
                return Err(CoreError::InvalidRule(format!(
                    "day of month must be within 1..=31, got {}",
                    day
                )));
            }
            _ => {}
        }

        if spec.max_occurrences == Some(0) {
            return Err(CoreError::InvalidRule(
                "max_occurrences must be at least 1".to_string(),
            ));
        }

        if let Some(adjustment) = &spec.adjustment {
            let zero_offset = adjustment
                .weekday_conditions
                .iter()
                .any(|c| matches!(c.target, ShiftTarget::DaysOffset { days: 0 }));
            if zero_offset {
                return Err(CoreError::InvalidRule(
                    "days_offset adjustment must move by at least 1 day".to_string(),
                ));
            }
        }

        let days_of_week = if spec.days_of_week.is_empty() {
            None
        } else {
            Some(spec.days_of_week.into_iter().collect())
        };

        Ok(Self {
            unit: spec.unit,
            interval,
            days_of_week,
            monthly_pattern: spec.monthly_pattern,
            adjustment: spec.adjustment.filter(|a| !a.is_empty()),
            end_date: spec.end_date,
            max_occurrences: spec.max_occurrences,
        })
    }
}

impl From<RecurrenceRule> for RuleSpec {
    fn from(rule: RecurrenceRule) -> Self {
        Self {
            unit: rule.unit,
            interval: i64::from(rule.interval),
            days_of_week: rule.days_of_week.map(Vec::from_iter).unwrap_or_default(),
            monthly_pattern: rule.monthly_pattern,
            adjustment: rule.adjustment,
            end_date: rule.end_date,
            max_occurrences: rule.max_occurrences,
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            IntervalUnit::HalfYear => "half-year".to_string(),
            other => other.to_string(),
        };
        if self.interval == 1 {
            write!(f, "every {}", unit)?;
        } else {
            write!(f, "every {} {}s", self.interval, unit)?;
        }

        if let Some(days) = &self.days_of_week {
            let names: Vec<&str> = days.iter().map(|d| d.short_name()).collect();
            write!(f, " on {}", names.join(", "))?;
        }

        match self.monthly_pattern {
            Some(MonthlyPattern::SpecificDay { day }) => write!(f, " on day {}", day)?,
            Some(MonthlyPattern::NthWeekday { position, weekday }) => {
                write!(f, " on the {} {}", position, weekday)?
            }
            None => {}
        }

        if let Some(adjustment) = &self.adjustment {
            match adjustment.len() {
                1 => write!(f, " (1 adjustment)")?,
                n => write!(f, " ({} adjustments)", n)?,
            }
        }
        if let Some(end_date) = self.end_date {
            write!(f, " until {}", end_date)?;
        }
        if let Some(max) = self.max_occurrences {
            write!(f, " for {} occurrences", max)?;
        }
        Ok(())
    }
}
