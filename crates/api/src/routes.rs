// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The §6 HTTP surface: one handler per row of the endpoint table.

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::models::*;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use qg_core::{Job, JobId, WorkerId};
use qg_store::{GroupFilter, JobFilter, Store, WorkerFilter};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/jobs", post(submit_job).get(list_jobs))
        .route("/jobs/:id", get(get_job).put(update_job))
        .route("/groups", get(list_groups))
        .route("/workers", post(register_worker).get(list_workers))
        .route("/workers/:id/heartbeat", post(heartbeat))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage_label,
    })
}

async fn submit_job(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SubmitJobRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<SubmitJobResponse>)> {
    let payload = qg_core::JobPayload {
        org_id: request.org_id,
        app_version_id: request.app_version_id,
        test_path: request.test_path,
        target: request.target,
        priority: request.priority,
        metadata: request.metadata,
    };
    let job = state.scheduler.submit_job(payload).await?;
    Ok((axum::http::StatusCode::CREATED, Json(SubmitJobResponse::from(&job))))
}

async fn get_job(State(state): State<Arc<AppState>>, Path(id): Path<JobId>) -> ApiResult<Json<Job>> {
    let job = state.store.get_job(&id).await?;
    Ok(Json(job))
}

async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<JobId>,
    ApiJson(request): ApiJson<UpdateJobRequest>,
) -> ApiResult<Json<Job>> {
    let mut job = state.store.get_job(&id).await?;
    let now = Utc::now();

    if let Some(worker_id) = request.worker_id {
        job.assigned_worker = Some(worker_id);
    }
    if let Some(result) = request.result {
        job.result = Some(result);
    }
    if let Some(error_message) = request.error_message {
        job.error_message = Some(error_message);
    }
    let held_worker = job.assigned_worker;

    if let Some(status) = request.status {
        match status {
            qg_core::JobStatus::Running => job.mark_running(now),
            qg_core::JobStatus::Completed => job.mark_completed(job.result.clone(), now),
            qg_core::JobStatus::Failed => {
                let message = job.error_message.clone().unwrap_or_else(|| "failed".to_string());
                job.mark_failed(message, now);
            }
            other => {
                job.status = other;
                job.updated_at = now;
            }
        }
    } else {
        job.updated_at = now;
    }

    state.store.update_job(job.clone()).await?;
    if job.is_terminal() {
        if let Some(worker_id) = held_worker {
            state.store.complete(&job.id, &worker_id).await?;
        }
    }
    Ok(Json(job))
}

async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let filter = JobFilter {
        org_id: query.org_id,
        status: query.status,
        app_version_id: query.app_version_id,
    };
    let jobs = state.store.list_jobs(&filter).await?;
    Ok(Json(JobListResponse { count: jobs.len(), jobs }))
}

async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupListQuery>,
) -> ApiResult<Json<GroupListResponse>> {
    let filter = GroupFilter {
        org_id: query.org_id,
        status: None,
    };
    let groups = state.store.list_groups(&filter).await?;
    Ok(Json(GroupListResponse { count: groups.len(), groups }))
}

async fn register_worker(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterWorkerRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<RegisterWorkerResponse>)> {
    if request.name.trim().is_empty() || request.target_types.is_empty() {
        return Err(ApiError(qg_core::OrchestratorError::validation(
            "name and target_types are required",
        )));
    }
    let worker = qg_core::Worker::new(request.name, request.target_types, &state.clock);
    let worker = state.scheduler.register_worker(worker).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(RegisterWorkerResponse { worker_id: worker.id }),
    ))
}

async fn list_workers(State(state): State<Arc<AppState>>) -> ApiResult<Json<WorkerListResponse>> {
    let workers = state.store.list_workers(&WorkerFilter::default()).await?;
    Ok(Json(WorkerListResponse { count: workers.len(), workers }))
}

async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WorkerId>,
) -> ApiResult<Json<HeartbeatResponse>> {
    let ack = state.scheduler.heartbeat(&id).await?;
    Ok(Json(HeartbeatResponse {
        status: "ok",
        next_job: ack.next_job,
    }))
}

async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<qg_store::QueueStatistics>> {
    let stats = state.store.queue_statistics().await?;
    Ok(Json(stats))
}
