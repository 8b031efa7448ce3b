use anyhow::{anyhow, bail, Context, Result};
use figment::{
    providers::{Format, Toml},
    value::{Dict, Value},
    Figment,
};
use recur_core::calendar::{DayOfWeek, WeekOfMonth};
use recur_core::models::Task;
use recur_core::rule::{MonthlyPattern, RecurrenceRule, RuleSpec};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::cli::RuleArgs;
use crate::parser::parse_date;

/// Key under which the TOML reader hands over native date and time values.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Reads a TOML or JSON document, picked by file extension.
///
/// TOML may use native dates (`plan_end_at = 2024-01-12T09:00:00`) as well
/// as quoted ones.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&contents)?
    } else {
        let value: Value = Figment::from(Toml::string(&contents)).extract()?;
        unwrap_toml_datetimes(value).deserialize()?
    };
    Ok(parsed)
}

/// Replaces native TOML date and time values with their string form.
fn unwrap_toml_datetimes(value: Value) -> Value {
    match value {
        Value::Dict(tag, dict) => {
            if dict.len() == 1 {
                if let Some(Value::String(_, datetime)) = dict.get(TOML_DATETIME_KEY) {
                    return Value::String(tag, datetime.clone());
                }
            }
            let dict: Dict = dict
                .into_iter()
                .map(|(key, value)| (key, unwrap_toml_datetimes(value)))
                .collect();
            Value::Dict(tag, dict)
        }
        Value::Array(tag, items) => {
            Value::Array(tag, items.into_iter().map(unwrap_toml_datetimes).collect())
        }
        other => other,
    }
}

pub fn load_task(path: &Path) -> Result<Task> {
    load_document(path).with_context(|| format!("Invalid task file '{}'", path.display()))
}

/// Resolves the rule from `--rule FILE` or the shorthand flags.
pub fn resolve_rule(args: &RuleArgs) -> Result<RecurrenceRule> {
    let spec = match &args.rule {
        Some(path) => {
            debug!(path = %path.display(), "loading rule file");
            load_document::<RuleSpec>(path)
                .with_context(|| format!("Invalid rule file '{}'", path.display()))?
        }
        None => spec_from_flags(args)?,
    };
    Ok(spec.build()?)
}

fn spec_from_flags(args: &RuleArgs) -> Result<RuleSpec> {
    let unit = args
        .every
        .ok_or_else(|| anyhow!("Either --rule or --every is required"))?;

    let mut spec = RecurrenceRule::builder(unit).on_days(args.on.iter().copied());
    if let Some(interval) = args.interval {
        spec = spec.interval(interval);
    }
    if let Some(day) = args.day {
        spec = spec.monthly(MonthlyPattern::SpecificDay { day });
    }
    if let Some(nth) = &args.nth {
        spec = spec.monthly(parse_nth(nth)?);
    }
    if let Some(until) = &args.until {
        spec = spec.until(parse_date(until)?);
    }
    if let Some(count) = args.count {
        spec = spec.max_occurrences(count);
    }
    Ok(spec)
}

/// Parses `POSITION:WEEKDAY`, e.g. `second:sunday` or `last:fri`.
pub fn parse_nth(input: &str) -> Result<MonthlyPattern> {
    let Some((position, weekday)) = input.split_once(':') else {
        bail!("Expected POSITION:WEEKDAY (e.g. 'last:friday'), got '{}'", input);
    };
    Ok(MonthlyPattern::NthWeekday {
        position: position.parse::<WeekOfMonth>()?,
        weekday: weekday.parse::<DayOfWeek>()?,
    })
}
