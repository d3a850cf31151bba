// Exercises the HTTP surface end to end: router -> app state -> driver task
// -> engine, checking status codes and response bodies.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use clap::Parser;
use serde_json::{json, Value};
use tower::ServiceExt;

use sandglass::{
    config::Config,
    create_router,
    engine::{CountingAlarm, RecordingPresenter},
    spawn_engine, AppState,
};

fn app(args: &[&str]) -> Router {
    let mut argv = vec!["sandglass"];
    argv.extend_from_slice(args);
    let config = Config::parse_from(argv);

    let engine = spawn_engine(
        config.default_duration(),
        RecordingPresenter::new(),
        CountingAlarm::new(),
    );
    let state = Arc::new(AppState::new(
        &config,
        engine.action_tx.clone(),
        engine.snapshot_rx.clone(),
    ));
    create_router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(&[]);
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_shows_configured_duration() {
    let app = app(&["--minutes", "5"]);
    let (status, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["display"], "05:00");
    assert_eq!(body["timer"]["total_seconds"], 300);
    assert_eq!(body["timer"]["controls"]["start"], true);
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn start_pause_resume_reset_cycle() {
    let app = app(&["--minutes", "1"]);

    let (status, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["controls"]["pause"], true);

    let (status, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (status, body) = call(&app, Method::POST, "/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "paused");

    let (status, body) = call(&app, Method::POST, "/resume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");

    let (status, body) = call(&app, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 60);

    let (_, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "reset");
}

#[tokio::test]
async fn start_without_duration_is_rejected() {
    let app = app(&["--minutes", "0"]);
    let (status, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "set a duration first");
    assert_eq!(body["timer"]["status"], "idle");
}

#[tokio::test]
async fn duration_can_be_set_while_idle_only() {
    let app = app(&[]);
    let (status, body) = call(
        &app,
        Method::PUT,
        "/duration",
        Some(json!({ "minutes": 2, "seconds": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 150);

    call(&app, Method::POST, "/start", None).await;
    let (status, _) = call(
        &app,
        Method::PUT,
        "/duration",
        Some(json!({ "minutes": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn add_time_only_while_running() {
    let app = app(&["--minutes", "1"]);
    let (status, body) = call(
        &app,
        Method::POST,
        "/add-time",
        Some(json!({ "seconds": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "time can only be added while the timer is running");

    call(&app, Method::POST, "/start", None).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/add-time",
        Some(json!({ "minutes": 1, "seconds": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 150);

    let (status, _) = call(
        &app,
        Method::POST,
        "/add-time",
        Some(json!({ "seconds": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn presets_and_chain() {
    let app = app(&[]);

    let (status, body) = call(&app, Method::GET, "/presets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presets"], json!([1, 3, 5, 10]));
    assert_eq!(body["chained"]["first_minutes"], 4);

    let (status, body) = call(&app, Method::POST, "/preset/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 180);
    assert_eq!(body["timer"]["status"], "idle");

    let (status, body) = call(&app, Method::POST, "/chain", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 240);
    assert_eq!(body["timer"]["chained_run"]["kind"], "start_preset");
    assert_eq!(body["timer"]["chained_run"]["minutes"], 2);

    let (status, body) = call(&app, Method::POST, "/chain?first=10&second=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["total_seconds"], 600);
    assert_eq!(body["timer"]["chained_run"]["minutes"], 5);

    call(&app, Method::POST, "/start", None).await;
    let (status, body) = call(&app, Method::POST, "/preset/5", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["timer"]["total_seconds"], 600);
}

#[tokio::test]
async fn chain_without_second_run_is_rejected() {
    let app = app(&[]);
    let (status, _) = call(&app, Method::POST, "/chain?second=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_input_gets_an_error_body() {
    let app = app(&["--minutes", "1"]);
    call(&app, Method::POST, "/start", None).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/add-time",
        Some(json!({ "seconds": 1.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["timer"]["total_seconds"], 60);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/duration",
        Some(json!({ "minutes": "two" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let (status, body) = call(&app, Method::POST, "/preset/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["timer"]["status"], "running");

    let (status, body) = call(&app, Method::POST, "/chain?first=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn oversized_add_time_is_rejected() {
    let app = app(&["--minutes", "1"]);
    call(&app, Method::POST, "/start", None).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/add-time",
        Some(json!({ "seconds": i64::MAX })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body_after_reset) = call(&app, Method::POST, "/reset", None).await;
    assert_eq!(body["timer"]["total_seconds"], 60);
    assert_eq!(body_after_reset["timer"]["total_seconds"], 60);
}

#[tokio::test]
async fn status_carries_hourglass_drawing_rules() {
    let four = app(&["--minutes", "4"]);
    let (_, body) = call(&four, Method::GET, "/status", None).await;
    let fill = &body["timer"]["hourglass"];
    assert_eq!(fill["top_percent"], 100.0);
    assert_eq!(fill["bottom_percent"], 0.0);
    assert_eq!(fill["top_visible"], true);
    assert_eq!(fill["bottom_visible"], false);
    assert_eq!(fill["show_surface"], false);
    assert_eq!(fill["top_clip_percent"], 0.0);

    let unset = app(&["--minutes", "0"]);
    let (_, body) = call(&unset, Method::GET, "/status", None).await;
    assert!(body["timer"]["hourglass"].is_null());
}
