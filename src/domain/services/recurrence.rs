use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use std::collections::BTreeSet;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePattern {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePattern {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Raw recurrence fields as they arrive from a request (or merged from a
/// stored event). Everything is optional so validation can report all
/// missing pieces at once instead of failing on the first.
#[derive(Debug, Default, Clone)]
pub struct RecurrenceInput {
    pub pattern: Option<String>,
    pub weekdays: Option<Vec<i64>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_occurrences: Option<i64>,
}

/// A validated recurrence rule. `weekdays` is populated for weekly rules
/// only (0 = Sunday .. 6 = Saturday).
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub weekdays: BTreeSet<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_occurrences: Option<i64>,
}

fn parse_date_field(field: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let raw = value?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(format!("{} must be a valid YYYY-MM-DD date (got '{}')", field, raw));
            None
        }
    }
}

/// Validates the six recurrence fields and returns either the parsed rule
/// or every violated constraint. Never touches storage.
pub fn validate(input: &RecurrenceInput) -> Result<RecurrenceRule, Vec<String>> {
    let mut errors = Vec::new();

    let pattern = match input.pattern.as_deref() {
        None | Some("") => RecurrencePattern::None,
        Some(raw) => match RecurrencePattern::parse(raw) {
            Some(p) => p,
            None => {
                errors.push(format!(
                    "pattern must be one of none, daily, weekly, monthly, yearly (got '{}')",
                    raw
                ));
                RecurrencePattern::None
            }
        },
    };

    let start_date = parse_date_field("start_date", input.start_date.as_deref(), &mut errors);
    let end_date = parse_date_field("end_date", input.end_date.as_deref(), &mut errors);

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end <= start {
            errors.push("end_date must be after start_date".to_string());
        }
    }

    if let Some(max) = input.max_occurrences {
        if max <= 0 {
            errors.push("max_occurrences must be a positive integer".to_string());
        }
    }

    let mut weekdays = BTreeSet::new();
    if pattern != RecurrencePattern::None {
        if input.start_date.is_none() {
            errors.push("start_date is required for recurring events".to_string());
        }
        if input.end_date.is_none() && input.max_occurrences.is_none() {
            errors.push("a recurring event needs an end_date or max_occurrences".to_string());
        }
    }

    if pattern == RecurrencePattern::Weekly {
        match &input.weekdays {
            None => errors.push("weekdays is required for weekly recurrence".to_string()),
            Some(days) if days.is_empty() => {
                errors.push("weekdays must not be empty for weekly recurrence".to_string());
            }
            Some(days) => {
                for day in days {
                    if (0..=6).contains(day) {
                        weekdays.insert(*day as u32);
                    } else {
                        errors.push(format!(
                            "weekdays values must be between 0 (Sunday) and 6 (Saturday), got {}",
                            day
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(RecurrenceRule {
            pattern,
            weekdays,
            start_date,
            end_date,
            max_occurrences: input.max_occurrences,
        })
    } else {
        Err(errors)
    }
}

/// Expands a rule into the ordered list of occurrence dates.
///
/// A `none` rule yields exactly its start date. Every other pattern walks
/// the calendar one day at a time from `start_date` and keeps the days the
/// pattern selects: every day for `daily`, matching weekdays for `weekly`,
/// matching day-of-month for `monthly` (months without that day simply
/// yield nothing), matching month and day for `yearly` (so a Feb 29 rule
/// fires only in leap years).
///
/// When both `end_date` and `max_occurrences` are set, the walk stops at
/// whichever bound is reached first.
pub fn generate(rule: &RecurrenceRule) -> Vec<NaiveDate> {
    let start = match rule.start_date {
        Some(d) => d,
        None => return Vec::new(),
    };

    if rule.pattern == RecurrencePattern::None {
        return vec![start];
    }

    let mut dates = Vec::new();
    let mut cursor = start;
    loop {
        if let Some(end) = rule.end_date {
            if cursor > end {
                break;
            }
        }
        if let Some(max) = rule.max_occurrences {
            if dates.len() as i64 >= max {
                break;
            }
        }

        let qualifies = match rule.pattern {
            RecurrencePattern::None => false,
            RecurrencePattern::Daily => true,
            RecurrencePattern::Weekly => {
                rule.weekdays.contains(&cursor.weekday().num_days_from_sunday())
            }
            RecurrencePattern::Monthly => cursor.day() == start.day(),
            RecurrencePattern::Yearly => {
                cursor.month() == start.month() && cursor.day() == start.day()
            }
        };

        if qualifies {
            dates.push(cursor);
        }
        cursor += Duration::days(1);
    }

    dates
}

/// Whether a wall-clock interval wraps past midnight. Only the hour and
/// minute components take part in the comparison; seconds are ignored.
pub fn crosses_midnight(start_time: &str, end_time: &str) -> bool {
    let parsed = (
        NaiveTime::parse_from_str(start_time, TIME_FORMAT),
        NaiveTime::parse_from_str(end_time, TIME_FORMAT),
    );
    match parsed {
        (Ok(start), Ok(end)) => {
            end.hour() < start.hour()
                || (end.hour() == start.hour() && end.minute() < start.minute())
        }
        _ => false,
    }
}

pub fn is_valid_time(s: &str) -> bool {
    NaiveTime::parse_from_str(s, TIME_FORMAT).is_ok()
}

/// An interval that does not cross midnight must end after it starts.
/// `HH:MM:SS` strings compare correctly as plain strings, so the check is
/// lexicographic; crossing intervals are exempt.
pub fn validate_time_order(start_time: &str, end_time: &str) -> Result<(), String> {
    if !crosses_midnight(start_time, end_time) && end_time <= start_time {
        return Err("end_time must be after start_time unless the interval crosses midnight".to_string());
    }
    Ok(())
}

pub fn encode_weekdays(days: &[i64]) -> String {
    serde_json::to_string(days).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_weekdays(raw: Option<&str>) -> Option<Vec<i64>> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}
