// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use qg_core::SystemClock;
use qg_scheduler::{Scheduler, SchedulerConfig};
use qg_store::local::LocalStore;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let store: Arc<dyn qg_store::Store> = Arc::new(LocalStore::new());
    let scheduler = Scheduler::new(store.clone(), SystemClock, SchedulerConfig::default());
    let state = Arc::new(AppState {
        store,
        scheduler,
        clock: SystemClock,
        storage_label: "local",
    });
    router(state)
}

#[tokio::test]
async fn health_returns_ok_with_storage_label() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn submitting_a_job_with_missing_fields_is_a_bad_request() {
    let app = test_app();
    let body = serde_json::json!({"org_id": "", "app_version_id": "", "test_path": ""});
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submitting_a_job_with_absent_fields_is_a_bad_request_not_unprocessable() {
    let app = test_app();
    let body = serde_json::json!({});
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submitting_a_job_with_an_unknown_target_value_is_a_bad_request() {
    let app = test_app();
    let body = serde_json::json!({
        "org_id": "qualgent",
        "app_version_id": "v1.2.3",
        "test_path": "tests/smoke.yaml",
        "target": "toaster",
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submitting_a_valid_job_returns_201_and_pending_status() {
    let app = test_app();
    let body = serde_json::json!({
        "org_id": "qualgent",
        "app_version_id": "v1.2.3",
        "test_path": "tests/smoke.yaml",
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn getting_an_unknown_job_is_a_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/jobs/job-does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn heartbeat_on_an_unknown_worker_is_a_404() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/workers/wkr-does-not-exist/heartbeat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
