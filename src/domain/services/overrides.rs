use serde::Serialize;
use chrono::NaiveDate;

use crate::domain::models::{event::MasterEvent, instance::EventInstance};
use crate::domain::services::recurrence;

/// The value actually shown for one occurrence after override resolution.
#[derive(Debug, Serialize, Clone)]
pub struct EffectiveInstance {
    pub id: String,
    pub event_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub tag_id: String,
    pub is_cancelled: bool,
    pub crosses_midnight: bool,
}

/// Resolves every displayable field of an instance against its master:
/// the per-instance override wins when set, the master value otherwise.
/// `crosses_midnight` is not a plain fallback — it is recomputed from the
/// effective time pair, so overriding only one end of the interval still
/// yields a flag consistent with the other end's master value.
pub fn resolve(master: &MasterEvent, instance: &EventInstance) -> EffectiveInstance {
    let start_time = instance
        .custom_start_time
        .clone()
        .unwrap_or_else(|| master.start_time.clone());
    let end_time = instance
        .custom_end_time
        .clone()
        .unwrap_or_else(|| master.end_time.clone());
    let crosses_midnight = recurrence::crosses_midnight(&start_time, &end_time);

    EffectiveInstance {
        id: instance.id.clone(),
        event_id: instance.event_id.clone(),
        date: instance.date,
        title: instance
            .custom_title
            .clone()
            .unwrap_or_else(|| master.title.clone()),
        description: instance
            .custom_description
            .clone()
            .or_else(|| master.description.clone()),
        start_time,
        end_time,
        image_url: instance
            .custom_image_url
            .clone()
            .or_else(|| master.image_url.clone()),
        external_link: instance
            .custom_external_link
            .clone()
            .or_else(|| master.external_link.clone()),
        tag_id: instance
            .custom_tag_id
            .clone()
            .unwrap_or_else(|| master.event_tag_id.clone()),
        is_cancelled: instance.is_cancelled,
        crosses_midnight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn master() -> MasterEvent {
        MasterEvent {
            id: "ev-1".to_string(),
            bar_id: "bar-1".to_string(),
            title: "A".to_string(),
            description: Some("house night".to_string()),
            image_url: None,
            external_link: Some("https://example.com".to_string()),
            event_tag_id: "tag-1".to_string(),
            start_time: "20:00:00".to_string(),
            end_time: "23:00:00".to_string(),
            crosses_midnight: false,
            pattern: "weekly".to_string(),
            weekdays: Some("[5]".to_string()),
            start_date: None,
            end_date: None,
            max_occurrences: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn instance() -> EventInstance {
        EventInstance::new("ev-1".to_string(), Utc::now().date_naive(), false)
    }

    #[test]
    fn override_wins_and_absent_override_falls_back() {
        let master = master();
        let mut inst = instance();
        inst.custom_title = Some("B".to_string());
        inst.custom_start_time = None;

        let effective = resolve(&master, &inst);
        assert_eq!(effective.title, "B");
        assert_eq!(effective.start_time, "20:00:00");
        assert_eq!(effective.description.as_deref(), Some("house night"));
        assert_eq!(effective.tag_id, "tag-1");
    }

    #[test]
    fn crossing_flag_is_recomputed_from_the_effective_pair() {
        let master = master();
        let mut inst = instance();

        // only the end time is overridden; the effective start is still
        // the master's 20:00, so 02:00 wraps past midnight
        inst.custom_end_time = Some("02:00:00".to_string());
        // a stale stored flag must not leak through
        inst.crosses_midnight = false;

        let effective = resolve(&master, &inst);
        assert!(effective.crosses_midnight);
        assert_eq!(effective.end_time, "02:00:00");
    }

    #[test]
    fn untouched_instance_mirrors_the_master() {
        let master = master();
        let inst = instance();

        let effective = resolve(&master, &inst);
        assert_eq!(effective.title, master.title);
        assert_eq!(effective.start_time, master.start_time);
        assert_eq!(effective.end_time, master.end_time);
        assert!(!effective.crosses_midnight);
        assert!(!effective.is_cancelled);
    }
}
