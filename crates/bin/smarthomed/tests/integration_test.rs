//! End-to-end smoke tests for the full smarthomed stack.
//!
//! Each test spins up the complete application (seeded storage backend, real
//! services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use smarthome_adapter_http_axum::router;
use smarthome_adapter_http_axum::state::AppState;
use smarthome_adapter_storage_file::JsonFileStore;
use smarthome_adapter_storage_sqlite_sqlx::{
    Config, SqliteDeviceStateRepository, SqliteHealthProbe, SqliteSeeder,
};
use smarthome_app::auth::SkillTokenGuard;
use smarthome_app::ports::SeedOptions;
use smarthome_app::services::device_state_service::DeviceStateService;
use smarthome_app::services::health_service::HealthService;
use smarthome_app::services::seed_service::SeedService;
use smarthome_domain::id::DeviceId;
use tower::ServiceExt;

const TOKEN: &str = "integration-token";

/// Build a fully-wired router backed by a seeded in-memory `SQLite` database.
async fn sqlite_app(default_device: DeviceId) -> Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    SeedService::new(
        SqliteSeeder::new(pool.clone()),
        SeedOptions {
            default_device: Some(default_device),
        },
    )
    .run(false)
    .await
    .expect("seeding should succeed");

    router::build(AppState::new(
        DeviceStateService::new(SqliteDeviceStateRepository::new(pool.clone())),
        HealthService::new(SqliteHealthProbe::new(pool)),
        SkillTokenGuard::new(Some(TOKEN.to_string())),
        default_device,
    ))
}

/// Build a fully-wired router backed by a seeded JSON state file.
async fn file_app(store: JsonFileStore) -> Router {
    SeedService::new(
        store.clone(),
        SeedOptions {
            default_device: Some(store.device()),
        },
    )
    .run(false)
    .await
    .expect("seeding should succeed");

    let default_device = store.device();
    router::build(AppState::new(
        DeviceStateService::new(store.clone()),
        HealthService::new(store),
        SkillTokenGuard::new(Some(TOKEN.to_string())),
        default_device,
    ))
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-skill-token", TOKEN);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_healthy_database() {
    let app = sqlite_app(DeviceId::new()).await;

    let (status, body) = send(&app, request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, request("GET", "/health/db", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn should_not_require_token_for_health() {
    let app = sqlite_app(DeviceId::new()).await;

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// SQLite backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_seeded_default_device_as_off() {
    let default_device = DeviceId::new();
    let app = sqlite_app(default_device).await;

    let (status, body) = send(&app, request("GET", "/devices/state", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], default_device.to_string());
    assert_eq!(body["status"], "off");
}

#[tokio::test]
async fn should_complete_device_state_cycle() {
    let app = sqlite_app(DeviceId::new()).await;

    // Create
    let create = request("POST", "/devices", Some(r#"{"status":true}"#));
    let (status, created) = send(&app, create).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "on");
    let id = created["id"].as_str().unwrap().to_string();

    // Read
    let (status, fetched) = send(&app, request("GET", &format!("/devices/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "on");

    // Set
    let (status, set) = send(
        &app,
        request("POST", &format!("/devices/{id}"), Some(r#"{"status":false}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set["status"], "off");

    // Toggle
    let (status, toggled) =
        send(&app, request("POST", &format!("/devices/{id}/toggle"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "on");

    // List holds the seeded default plus the created device
    let (status, list) = send(&app, request("GET", "/devices", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn should_upsert_unknown_device_on_set() {
    let app = sqlite_app(DeviceId::new()).await;
    let uri = format!("/devices/{}", DeviceId::new());

    let (status, _) = send(&app, request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, request("POST", &uri, Some(r#"{"status":true}"#))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "on");

    let (status, body) = send(&app, request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "on");
}

#[tokio::test]
async fn should_return_to_original_status_after_two_toggles() {
    let app = sqlite_app(DeviceId::new()).await;

    let (_, first) = send(&app, request("POST", "/devices/toggle", None)).await;
    assert_eq!(first["status"], "on");
    let (_, second) = send(&app, request("POST", "/devices/toggle", None)).await;
    assert_eq!(second["status"], "off");
}

#[tokio::test]
async fn should_reject_requests_without_token() {
    let app = sqlite_app(DeviceId::new()).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/devices/state")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value =
        serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn should_return_400_for_malformed_id() {
    let app = sqlite_app(DeviceId::new()).await;

    let (status, body) = send(&app, request("GET", "/devices/lamp", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn should_return_404_for_toggle_of_unknown_device() {
    let app = sqlite_app(DeviceId::new()).await;

    let (status, _) = send(
        &app,
        request("POST", &format!("/devices/{}/toggle", DeviceId::new()), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// JSON file backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_persist_default_device_in_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let default_device = DeviceId::new();
    let app = file_app(JsonFileStore::new(&path, default_device)).await;

    let set = request("POST", "/devices/state", Some(r#"{"status":true}"#));
    let (status, body) = send(&app, set).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "on");

    // A fresh store over the same file sees the write.
    let reopened = file_app(JsonFileStore::new(&path, default_device)).await;
    let (status, body) = send(&reopened, request("GET", "/devices/state", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], default_device.to_string());
    assert_eq!(body["status"], "on");
}

#[tokio::test]
async fn should_report_healthy_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = file_app(JsonFileStore::new(dir.path().join("state.json"), DeviceId::new())).await;

    let (status, _) = send(&app, request("GET", "/health/db", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn should_hide_foreign_devices_in_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let app = file_app(JsonFileStore::new(dir.path().join("state.json"), DeviceId::new())).await;

    let foreign = format!("/devices/{}", DeviceId::new());
    let (status, _) = send(&app, request("GET", &foreign, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = send(&app, request("GET", "/devices", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_set_of_foreign_device_in_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let app = file_app(JsonFileStore::new(dir.path().join("state.json"), DeviceId::new())).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/devices/{}", DeviceId::new()),
            Some(r#"{"status":true}"#),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
