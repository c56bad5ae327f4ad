use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::{event::MasterEvent, instance::EventInstance};
use crate::domain::services::recurrence::{self, RecurrenceInput, DATE_FORMAT};

/// The master fields whose edit invalidates the matching per-instance
/// override on future occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideField {
    Title,
    Description,
    StartTime,
    EndTime,
    ImageUrl,
    ExternalLink,
}

impl OverrideField {
    /// Column holding the per-instance override for this field.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "custom_title",
            Self::Description => "custom_description",
            Self::StartTime => "custom_start_time",
            Self::EndTime => "custom_end_time",
            Self::ImageUrl => "custom_image_url",
            Self::ExternalLink => "custom_external_link",
        }
    }
}

/// A partial edit of a master event. `None` means "leave unchanged".
#[derive(Debug, Default, Clone)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub event_tag_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pattern: Option<String>,
    pub weekdays: Option<Vec<i64>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_occurrences: Option<i64>,
    pub regenerate_instances: Option<bool>,
    pub cancel_all_instances: Option<bool>,
}

impl EventPatch {
    fn touches_recurrence(&self) -> bool {
        self.pattern.is_some()
            || self.weekdays.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.max_occurrences.is_some()
    }

    fn touches_time(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}

/// Everything a master-event edit implies for the instance set, applied by
/// the event repository inside one transaction. Past occurrences
/// (`date < today`) are never part of any step.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub today: NaiveDate,
    /// `Some` means: delete every instance dated today or later, then
    /// insert these freshly generated replacements (possibly none).
    pub regenerated: Option<Vec<EventInstance>>,
    /// Overrides to null out on future instances, one entry per edited
    /// master field.
    pub reset_fields: Vec<OverrideField>,
    /// Explicit bulk-cancel (or un-cancel) of future instances.
    pub set_cancelled: Option<bool>,
    /// New `crosses_midnight` value for future instances that still track
    /// the master's times. Unset when regeneration already rebuilt them.
    pub recompute_crossing: Option<bool>,
}

/// Builds the instance rows for a freshly created master event, one per
/// generated date, each inheriting the master's midnight flag.
pub fn materialize(event: &MasterEvent, dates: &[NaiveDate]) -> Vec<EventInstance> {
    dates
        .iter()
        .map(|d| EventInstance::new(event.id.clone(), *d, event.crosses_midnight))
        .collect()
}

/// The one place deciding which override resets a patch implies: each rule
/// pairs "was this master field edited" with the override it invalidates.
fn reset_fields_for(patch: &EventPatch) -> Vec<OverrideField> {
    let rules = [
        (patch.title.is_some(), OverrideField::Title),
        (patch.description.is_some(), OverrideField::Description),
        (patch.start_time.is_some(), OverrideField::StartTime),
        (patch.end_time.is_some(), OverrideField::EndTime),
        (patch.image_url.is_some(), OverrideField::ImageUrl),
        (patch.external_link.is_some(), OverrideField::ExternalLink),
    ];

    rules
        .into_iter()
        .filter(|(edited, _)| *edited)
        .map(|(_, field)| field)
        .collect()
}

/// Merges an edit payload over the current master and derives the update
/// plan: the updated master row plus the future-instance work (regenerate,
/// reset overrides, bulk cancel, midnight cascade). Returns every
/// validation failure at once and plans nothing when any field is invalid.
pub fn plan_update(
    current: &MasterEvent,
    patch: &EventPatch,
    today: NaiveDate,
) -> Result<(MasterEvent, SyncPlan), Vec<String>> {
    let mut errors = Vec::new();
    let mut updated = current.clone();

    if let Some(v) = &patch.title {
        updated.title = v.clone();
    }
    if let Some(v) = &patch.description {
        updated.description = Some(v.clone());
    }
    if let Some(v) = &patch.image_url {
        updated.image_url = Some(v.clone());
    }
    if let Some(v) = &patch.external_link {
        updated.external_link = Some(v.clone());
    }
    if let Some(v) = &patch.event_tag_id {
        updated.event_tag_id = v.clone();
    }

    if let Some(v) = &patch.start_time {
        if recurrence::is_valid_time(v) {
            updated.start_time = v.clone();
        } else {
            errors.push(format!("start_time must be a valid HH:MM:SS time (got '{}')", v));
        }
    }
    if let Some(v) = &patch.end_time {
        if recurrence::is_valid_time(v) {
            updated.end_time = v.clone();
        } else {
            errors.push(format!("end_time must be a valid HH:MM:SS time (got '{}')", v));
        }
    }
    if patch.touches_time() {
        updated.crosses_midnight =
            recurrence::crosses_midnight(&updated.start_time, &updated.end_time);
        if let Err(e) = recurrence::validate_time_order(&updated.start_time, &updated.end_time) {
            errors.push(e);
        }
    }

    let force = patch.regenerate_instances.unwrap_or(false);
    let mut regenerated = None;

    if patch.touches_recurrence() || force {
        let merged = RecurrenceInput {
            pattern: patch
                .pattern
                .clone()
                .or_else(|| Some(current.pattern.clone())),
            weekdays: patch
                .weekdays
                .clone()
                .or_else(|| recurrence::decode_weekdays(current.weekdays.as_deref())),
            start_date: patch
                .start_date
                .clone()
                .or_else(|| current.start_date.map(|d| d.format(DATE_FORMAT).to_string())),
            end_date: patch
                .end_date
                .clone()
                .or_else(|| current.end_date.map(|d| d.format(DATE_FORMAT).to_string())),
            max_occurrences: patch.max_occurrences.or(current.max_occurrences),
        };

        match recurrence::validate(&merged) {
            Ok(rule) => {
                updated.pattern = rule.pattern.as_str().to_string();
                if let Some(days) = &patch.weekdays {
                    updated.weekdays = Some(recurrence::encode_weekdays(days));
                }
                updated.start_date = rule.start_date;
                updated.end_date = rule.end_date;
                updated.max_occurrences = rule.max_occurrences;

                if rule.start_date.is_some() {
                    let future = recurrence::generate(&rule)
                        .into_iter()
                        .filter(|d| *d >= today)
                        .map(|d| {
                            EventInstance::new(updated.id.clone(), d, updated.crosses_midnight)
                        })
                        .collect();
                    regenerated = Some(future);
                }
            }
            Err(mut rule_errors) => errors.append(&mut rule_errors),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let recompute_crossing = if patch.touches_time() && regenerated.is_none() {
        Some(updated.crosses_midnight)
    } else {
        None
    };

    let plan = SyncPlan {
        today,
        regenerated,
        reset_fields: reset_fields_for(patch),
        set_cancelled: patch.cancel_all_instances,
        recompute_crossing,
    };

    Ok((updated, plan))
}

/// `is_cancelled` arrives either as a JSON boolean or as the literal
/// strings "true"/"false"; anything else is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BoolPayload {
    Flag(bool),
    Text(String),
}

fn coerce_bool(value: &BoolPayload) -> Result<bool, String> {
    match value {
        BoolPayload::Flag(b) => Ok(*b),
        BoolPayload::Text(s) => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(format!("is_cancelled must be a boolean (got '{}')", other)),
        },
    }
}

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LINK_LEN: usize = 500;

/// A direct edit of one instance. Text overrides are trimmed; an empty
/// string clears the override rather than storing an empty value.
#[derive(Debug, Default, Clone)]
pub struct InstancePatch {
    pub date: Option<String>,
    pub custom_title: Option<String>,
    pub custom_description: Option<String>,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
    pub custom_image_url: Option<String>,
    pub custom_external_link: Option<String>,
    pub custom_tag_id: Option<String>,
    pub is_cancelled: Option<BoolPayload>,
}

impl InstancePatch {
    /// True when the edit sets a (non-clearing) tag override, i.e. the
    /// caller must verify the referenced tag exists.
    pub fn is_tag_edit(&self) -> bool {
        self.custom_tag_id
            .as_deref()
            .map(str::trim)
            .is_some_and(|t| !t.is_empty())
    }
}

fn apply_text_override(
    target: &mut Option<String>,
    raw: &str,
    field: &str,
    max_len: Option<usize>,
    errors: &mut Vec<String>,
) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        *target = None;
        return;
    }
    if let Some(max) = max_len {
        if trimmed.chars().count() > max {
            errors.push(format!("{} must be at most {} characters", field, max));
            return;
        }
    }
    *target = Some(trimmed.to_string());
}

fn apply_time_override(
    target: &mut Option<String>,
    raw: &str,
    field: &str,
    errors: &mut Vec<String>,
) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        *target = None;
        return;
    }
    if recurrence::is_valid_time(trimmed) {
        *target = Some(trimmed.to_string());
    } else {
        errors.push(format!("{} must be a valid HH:MM:SS time (got '{}')", field, trimmed));
    }
}

/// Validates and applies a direct instance edit, returning the updated row.
/// Setting or clearing either custom time recomputes the stored midnight
/// flag from the pair that is effective after the edit (custom where set,
/// master otherwise). The caller checks `custom_tag_id` references and
/// persists the row; a date collision surfaces from storage as a
/// duplicate-occurrence conflict.
pub fn plan_instance_edit(
    master: &MasterEvent,
    current: &EventInstance,
    patch: &InstancePatch,
) -> Result<EventInstance, Vec<String>> {
    let mut errors = Vec::new();
    let mut updated = current.clone();

    if let Some(raw) = &patch.date {
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(d) => updated.date = d,
            Err(_) => errors.push(format!("date must be a valid YYYY-MM-DD date (got '{}')", raw)),
        }
    }

    if let Some(raw) = &patch.custom_title {
        apply_text_override(&mut updated.custom_title, raw, "custom_title", Some(MAX_TITLE_LEN), &mut errors);
    }
    if let Some(raw) = &patch.custom_description {
        apply_text_override(&mut updated.custom_description, raw, "custom_description", None, &mut errors);
    }
    if let Some(raw) = &patch.custom_image_url {
        apply_text_override(&mut updated.custom_image_url, raw, "custom_image_url", None, &mut errors);
    }
    if let Some(raw) = &patch.custom_external_link {
        apply_text_override(&mut updated.custom_external_link, raw, "custom_external_link", Some(MAX_LINK_LEN), &mut errors);
    }
    if let Some(raw) = &patch.custom_tag_id {
        let trimmed = raw.trim();
        updated.custom_tag_id = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    if let Some(raw) = &patch.custom_start_time {
        apply_time_override(&mut updated.custom_start_time, raw, "custom_start_time", &mut errors);
    }
    if let Some(raw) = &patch.custom_end_time {
        apply_time_override(&mut updated.custom_end_time, raw, "custom_end_time", &mut errors);
    }

    if let Some(flag) = &patch.is_cancelled {
        match coerce_bool(flag) {
            Ok(b) => updated.is_cancelled = b,
            Err(e) => errors.push(e),
        }
    }

    if patch.custom_start_time.is_some() || patch.custom_end_time.is_some() {
        let effective_start = updated
            .custom_start_time
            .as_deref()
            .unwrap_or(&master.start_time);
        let effective_end = updated
            .custom_end_time
            .as_deref()
            .unwrap_or(&master.end_time);
        updated.crosses_midnight = recurrence::crosses_midnight(effective_start, effective_end);
        if let Err(e) = recurrence::validate_time_order(effective_start, effective_end) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(updated)
    } else {
        Err(errors)
    }
}
