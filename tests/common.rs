use venue_backend::{
    api::router::create_router,
    config::Config,
    infra::clock::SystemClock,
    infra::repositories::{
        sqlite_bar_repo::SqliteBarRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_instance_repo::SqliteInstanceRepo,
        sqlite_tag_repo::SqliteTagRepo,
    },
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
        };

        let state = Arc::new(AppState {
            config,
            bar_repo: Arc::new(SqliteBarRepo::new(pool.clone())),
            tag_repo: Arc::new(SqliteTagRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            instance_repo: Arc::new(SqliteInstanceRepo::new(pool.clone())),
            clock: Arc::new(SystemClock),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn post_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn put_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap()
    }

    /// Creates a bar and a tag and returns their ids; nearly every event
    /// test needs both in place first.
    pub async fn seed_bar_and_tag(&self) -> (String, String) {
        let bar_res = self.post_json(
            "/api/v1/bars",
            &serde_json::json!({"name": "The Anchor", "address": "1 Dock St", "city": "Hamburg"}),
        ).await;
        let bar = parse_body(bar_res).await;

        let tag_res = self.post_json(
            "/api/v1/tags",
            &serde_json::json!({"name": format!("live-music-{}", Uuid::new_v4())}),
        ).await;
        let tag = parse_body(tag_res).await;

        (
            bar["id"].as_str().unwrap().to_string(),
            tag["id"].as_str().unwrap().to_string(),
        )
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
