// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response bodies for the §6 HTTP surface. Entities already
//! serialize in the documented wire shape, so most responses wrap them
//! directly rather than projecting into a parallel DTO.

use chrono::{DateTime, Utc};
use qg_core::{Group, Job, JobId, JobPriority, JobStatus, JobTarget, Metadata, Worker, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub storage: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub app_version_id: String,
    #[serde(default)]
    pub test_path: String,
    #[serde(default)]
    pub target: JobTarget,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: JobId,
    pub status: JobStatus,
}

impl From<&Job> for SubmitJobResponse {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
        }
    }
}

/// Worker-driven update accepted by `PUT /jobs/<id>`.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateJobRequest {
    pub status: Option<JobStatus>,
    pub worker_id: Option<WorkerId>,
    pub result: Option<Metadata>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct JobListQuery {
    pub org_id: Option<String>,
    pub status: Option<JobStatus>,
    pub app_version_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub count: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct GroupListQuery {
    pub org_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<Group>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegisterWorkerRequest {
    pub name: String,
    pub target_types: HashSet<JobTarget>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct RegisterWorkerResponse {
    pub worker_id: WorkerId,
}

#[derive(Debug, Serialize)]
pub struct WorkerListResponse {
    pub workers: Vec<Worker>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_job: Option<Job>,
}
