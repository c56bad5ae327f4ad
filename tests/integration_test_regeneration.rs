mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::{parse_body, TestApp};
use serde_json::{json, Value};
use venue_backend::domain::models::instance::EventInstance;
use venue_backend::domain::services::scheduler::SyncPlan;
use venue_backend::error::AppError;

fn day(offset: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(offset)
}

fn day_str(offset: i64) -> String {
    day(offset).format("%Y-%m-%d").to_string()
}

/// Daily event spanning `start_offset..=end_offset` days around today.
async fn seed_spanning_event(app: &TestApp, start_offset: i64, end_offset: i64) -> (String, Vec<Value>) {
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "House Night",
            "event_tag_id": tag_id,
            "start_time": "20:00:00",
            "end_time": "23:00:00",
            "pattern": "daily",
            "start_date": day_str(start_offset),
            "end_date": day_str(end_offset)
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event = parse_body(res).await;
    let event_id = event["id"].as_str().unwrap().to_string();

    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let instances = parse_body(res).await.as_array().unwrap().clone();

    (event_id, instances)
}

fn instance_id_for(instances: &[Value], date: &str) -> String {
    instances.iter()
        .find(|i| i["date"] == date)
        .map(|i| i["id"].as_str().unwrap().to_string())
        .expect("no instance for date")
}

#[tokio::test]
async fn test_title_edit_clears_future_overrides_and_preserves_past_ones() {
    let app = TestApp::new().await;
    let (event_id, instances) = seed_spanning_event(&app, -5, 5).await;
    assert_eq!(instances.len(), 11);

    let past_id = instance_id_for(&instances, &day_str(-3));
    let future_id = instance_id_for(&instances, &day_str(2));

    for id in [&past_id, &future_id] {
        let res = app.put_json(
            &format!("/api/v1/instances/{}", id),
            &json!({"custom_title": "One Off Special"}),
        ).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app.put_json(
        &format!("/api/v1/events/{}", event_id),
        &json!({"title": "Rebranded Night"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    // the past occurrence keeps its override, the future one loses it
    let past = app.state.instance_repo.find_by_id(&past_id).await.unwrap().unwrap();
    assert_eq!(past.custom_title.as_deref(), Some("One Off Special"));

    let future = app.state.instance_repo.find_by_id(&future_id).await.unwrap().unwrap();
    assert!(future.custom_title.is_none());

    // a plain display edit must not regenerate: same rows, same ids
    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let after = parse_body(res).await;
    assert_eq!(after.as_array().unwrap().len(), 11);
    assert_eq!(instance_id_for(after.as_array().unwrap(), &day_str(2)), future_id);
}

#[tokio::test]
async fn test_recurrence_edit_regenerates_future_and_keeps_history() {
    let app = TestApp::new().await;
    let (event_id, instances) = seed_spanning_event(&app, -3, 3).await;
    assert_eq!(instances.len(), 7);

    let past_id = instance_id_for(&instances, &day_str(-2));

    let res = app.put_json(
        &format!("/api/v1/events/{}", event_id),
        &json!({"end_date": day_str(1)}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let after = parse_body(res).await;
    let dates: Vec<&str> = after.as_array().unwrap().iter()
        .map(|i| i["date"].as_str().unwrap())
        .collect();

    // past rows (-3..-1) survive untouched, future is rebuilt up to the new
    // end date (today and tomorrow)
    let expected: Vec<String> = vec![
        day_str(-3), day_str(-2), day_str(-1), day_str(0), day_str(1),
    ];
    assert_eq!(dates, expected);

    // the surviving past row is literally the same row
    assert_eq!(instance_id_for(after.as_array().unwrap(), &day_str(-2)), past_id);
}

#[tokio::test]
async fn test_cancel_all_hits_future_instances_only() {
    let app = TestApp::new().await;
    let (event_id, _) = seed_spanning_event(&app, -2, 2).await;

    let res = app.put_json(
        &format!("/api/v1/events/{}", event_id),
        &json!({"cancel_all_instances": true}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let after = parse_body(res).await;

    for instance in after.as_array().unwrap() {
        let date = NaiveDate::parse_from_str(instance["date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
        let expected = date >= day(0);
        assert_eq!(instance["is_cancelled"], expected, "wrong flag on {}", date);
    }

    // the toggle is explicit in both directions
    let res = app.put_json(
        &format!("/api/v1/events/{}", event_id),
        &json!({"cancel_all_instances": false}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let after = parse_body(res).await;
    assert!(after.as_array().unwrap().iter().all(|i| i["is_cancelled"] == false));
}

#[tokio::test]
async fn test_master_time_edit_cascades_to_instances_without_time_overrides() {
    let app = TestApp::new().await;
    let (event_id, instances) = seed_spanning_event(&app, 0, 3).await;

    // one occurrence gets its own start time; its stored flag stays
    // computed from (18:00, 23:00)
    let overridden_id = instance_id_for(&instances, &day_str(1));
    app.put_json(
        &format!("/api/v1/instances/{}", overridden_id),
        &json!({"custom_start_time": "18:00:00"}),
    ).await;

    // the master now ends past midnight
    let res = app.put_json(
        &format!("/api/v1/events/{}", event_id),
        &json!({"end_time": "01:00:00"}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["crosses_midnight"], true);

    let res = app.get(&format!("/api/v1/events/{}/instances", event_id)).await;
    let listing = parse_body(res).await;
    for instance in listing.as_array().unwrap() {
        let id = instance["id"].as_str().unwrap();
        let stored = app.state.instance_repo.find_by_id(id).await.unwrap().unwrap();
        if id == overridden_id {
            // skipped by the cascade: it no longer tracks the master times
            assert!(!stored.crosses_midnight);
        } else {
            assert!(stored.crosses_midnight);
        }
        // resolution recomputes either way, so every effective view agrees
        assert_eq!(instance["crosses_midnight"], true);
    }
}

#[tokio::test]
async fn test_failed_regeneration_rolls_back_completely() {
    let app = TestApp::new().await;
    let (event_id, before) = seed_spanning_event(&app, -2, 5).await;

    let event = app.state.event_repo.find_by_id(&event_id).await.unwrap().unwrap();
    let today = app.state.clock.today();

    // a regeneration batch carrying a duplicate date trips the
    // (event_id, date) constraint halfway through the inserts
    let dup = today + Duration::days(1);
    let plan = SyncPlan {
        today,
        regenerated: Some(vec![
            EventInstance::new(event.id.clone(), today, false),
            EventInstance::new(event.id.clone(), dup, false),
            EventInstance::new(event.id.clone(), dup, false),
        ]),
        reset_fields: vec![],
        set_cancelled: None,
        recompute_crossing: None,
    };

    let err = app.state.event_repo.apply_update(&event, &plan).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // the pre-update instance set survives intact, ids included
    let res = app.get(&format!("/api/v1/events/{}/instances?include_cancelled=true", event_id)).await;
    let after = parse_body(res).await;
    let before_ids: Vec<&str> = before.iter().map(|i| i["id"].as_str().unwrap()).collect();
    let after_ids: Vec<&str> = after.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(before_ids, after_ids);
}
