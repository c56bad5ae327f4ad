mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_daily_event_materializes_every_date_in_range() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Happy Hour",
            "event_tag_id": tag_id,
            "start_time": "17:00:00",
            "end_time": "19:00:00",
            "pattern": "daily",
            "start_date": "2024-06-01",
            "end_date": "2024-06-10"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event = parse_body(res).await;
    assert_eq!(event["pattern"], "daily");
    assert_eq!(event["crosses_midnight"], false);

    let event_id = event["id"].as_str().unwrap();
    let res = app.get(&format!("/api/v1/events/{}/instances", event_id)).await;
    let instances = parse_body(res).await;
    let instances = instances.as_array().unwrap();

    assert_eq!(instances.len(), 10);
    assert_eq!(instances[0]["date"], "2024-06-01");
    assert_eq!(instances[9]["date"], "2024-06-10");
    // instances show the master's fields until overridden
    assert!(instances.iter().all(|i| i["title"] == "Happy Hour"));
    assert!(instances.iter().all(|i| i["start_time"] == "17:00:00"));
}

#[tokio::test]
async fn test_weekly_event_selects_configured_weekdays_only() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    // 2024-01-01 is a Monday
    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Quiz Night",
            "event_tag_id": tag_id,
            "start_time": "19:30:00",
            "end_time": "22:00:00",
            "pattern": "weekly",
            "weekdays": [1, 3],
            "start_date": "2024-01-01",
            "end_date": "2024-01-14"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event = parse_body(res).await;

    let res = app.get(&format!("/api/v1/events/{}/instances", event["id"].as_str().unwrap())).await;
    let instances = parse_body(res).await;
    let dates: Vec<&str> = instances.as_array().unwrap().iter()
        .map(|i| i["date"].as_str().unwrap())
        .collect();

    assert_eq!(dates, vec!["2024-01-01", "2024-01-03", "2024-01-08", "2024-01-10"]);
}

#[tokio::test]
async fn test_monthly_event_skips_months_without_the_day() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Month End Party",
            "event_tag_id": tag_id,
            "start_time": "20:00:00",
            "end_time": "23:00:00",
            "pattern": "monthly",
            "start_date": "2024-01-31",
            "end_date": "2024-04-30"
        }),
    ).await;
    let event = parse_body(res).await;

    let res = app.get(&format!("/api/v1/events/{}/instances", event["id"].as_str().unwrap())).await;
    let instances = parse_body(res).await;
    let dates: Vec<&str> = instances.as_array().unwrap().iter()
        .map(|i| i["date"].as_str().unwrap())
        .collect();

    // February and April have no 31st
    assert_eq!(dates, vec!["2024-01-31", "2024-03-31"]);
}

#[tokio::test]
async fn test_yearly_leap_day_event_fires_only_in_leap_years() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Leap Day Special",
            "event_tag_id": tag_id,
            "start_time": "18:00:00",
            "end_time": "23:00:00",
            "pattern": "yearly",
            "start_date": "2024-02-29",
            "end_date": "2028-12-31"
        }),
    ).await;
    let event = parse_body(res).await;

    let res = app.get(&format!("/api/v1/events/{}/instances", event["id"].as_str().unwrap())).await;
    let instances = parse_body(res).await;
    let dates: Vec<&str> = instances.as_array().unwrap().iter()
        .map(|i| i["date"].as_str().unwrap())
        .collect();

    assert_eq!(dates, vec!["2024-02-29", "2028-02-29"]);
}

#[tokio::test]
async fn test_none_pattern_creates_a_single_instance() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "New Year's Eve Gala",
            "event_tag_id": tag_id,
            "start_time": "21:00:00",
            "end_time": "04:00:00",
            "pattern": "none",
            "start_date": "2024-12-31"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event = parse_body(res).await;
    assert_eq!(event["crosses_midnight"], true);

    let res = app.get(&format!("/api/v1/events/{}/instances", event["id"].as_str().unwrap())).await;
    let instances = parse_body(res).await;
    let instances = instances.as_array().unwrap();

    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["date"], "2024-12-31");
    assert_eq!(instances[0]["crosses_midnight"], true);
}

#[tokio::test]
async fn test_validation_errors_are_enumerated_and_nothing_is_written() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Broken",
            "event_tag_id": tag_id,
            "start_time": "19:00:00",
            "end_time": "22:00:00",
            "pattern": "weekly",
            "start_date": "not-a-date",
            "max_occurrences": 0
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = parse_body(res).await;
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);

    // the failed creation must not have left an event behind
    let res = app.get(&format!("/api/v1/bars/{}/events", bar_id)).await;
    assert!(parse_body(res).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_event_with_unknown_tag_is_rejected() {
    let app = TestApp::new().await;
    let (bar_id, _) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Orphan",
            "event_tag_id": "no-such-tag",
            "start_time": "19:00:00",
            "end_time": "22:00:00",
            "pattern": "none",
            "start_date": "2024-06-01"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_time_not_after_start_time_is_rejected_unless_crossing() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Zero Length",
            "event_tag_id": tag_id,
            "start_time": "12:00:00",
            "end_time": "12:00:00",
            "pattern": "none",
            "start_date": "2024-06-01"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // crossing midnight is fine even though end < start
    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Night Shift",
            "event_tag_id": tag_id,
            "start_time": "22:00:00",
            "end_time": "02:00:00",
            "pattern": "none",
            "start_date": "2024-06-01"
        }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_soft_delete_keeps_the_event_row() {
    let app = TestApp::new().await;
    let (bar_id, tag_id) = app.seed_bar_and_tag().await;

    let res = app.post_json(
        &format!("/api/v1/bars/{}/events", bar_id),
        &json!({
            "title": "Short Lived",
            "event_tag_id": tag_id,
            "start_time": "19:00:00",
            "end_time": "22:00:00",
            "pattern": "none",
            "start_date": "2024-06-01"
        }),
    ).await;
    let event = parse_body(res).await;
    let event_id = event["id"].as_str().unwrap();

    let res = app.router.clone().oneshot(
        axum::http::Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/events/{}", event_id))
            .body(axum::body::Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // deactivated, not gone: direct fetch still works, listing omits it
    let res = app.get(&format!("/api/v1/events/{}", event_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["is_active"], false);

    let res = app.get(&format!("/api/v1/bars/{}/events", bar_id)).await;
    assert!(parse_body(res).await.as_array().unwrap().is_empty());
}
