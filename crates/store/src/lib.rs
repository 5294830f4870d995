// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The concurrent repository over jobs, groups, and workers (§4.1).
//!
//! Two backends share the [`Store`] trait: [`local::LocalStore`] (in-memory,
//! `parking_lot`-guarded) and [`remote::RedisStore`] (a Redis hash-per-entity
//! layout). Both raise the same [`qg_core::OrchestratorError`] kinds so
//! callers above the store never need to know which backend they're on.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qg_core::{Group, GroupId, Job, JobId, JobStatus, JobTarget, Result, Worker, WorkerId, WorkerStatus};
use serde::{Deserialize, Serialize};

/// Filter for [`Store::list_jobs`]; every field is an optional conjunct.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub org_id: Option<String>,
    pub status: Option<JobStatus>,
    pub app_version_id: Option<String>,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        self.org_id.as_deref().is_none_or(|v| v == job.payload.org_id)
            && self.status.is_none_or(|v| v == job.status)
            && self
                .app_version_id
                .as_deref()
                .is_none_or(|v| v == job.payload.app_version_id)
    }
}

/// Filter for [`Store::list_groups`].
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub org_id: Option<String>,
    pub status: Option<JobStatus>,
}

impl GroupFilter {
    fn matches(&self, group: &Group) -> bool {
        self.org_id.as_deref().is_none_or(|v| v == group.org_id)
            && self.status.is_none_or(|v| v == group.status)
    }
}

/// Filter for [`Store::list_workers`].
#[derive(Debug, Clone, Default)]
pub struct WorkerFilter {
    pub target: Option<JobTarget>,
    pub status: Option<WorkerStatus>,
}

impl WorkerFilter {
    fn matches(&self, worker: &Worker) -> bool {
        self.target.is_none_or(|v| worker.accepts(v)) && self.status.is_none_or(|v| v == worker.status)
    }
}

/// Counts returned by [`Store::queue_statistics`] (§4.1 Derived).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStatistics {
    pub total_jobs: usize,
    pub pending_jobs: usize,
    pub queued_jobs: usize,
    pub running_jobs: usize,
    pub completed_jobs: usize,
    pub failed_jobs: usize,
    pub cancelled_jobs: usize,
    pub total_groups: usize,
    pub total_workers: usize,
    pub idle_workers: usize,
    pub busy_workers: usize,
    pub offline_workers: usize,
}

/// The repository contract shared by both backends.
///
/// Every method here is atomic with respect to concurrent callers. The
/// cross-entity methods ([`Store::assign`], [`Store::complete`]) are each a
/// single critical section: no intermediate state is observable.
#[async_trait]
pub trait Store: Send + Sync {
    async fn add_job(&self, job: Job) -> Result<()>;
    async fn get_job(&self, id: &JobId) -> Result<Job>;
    async fn update_job(&self, job: Job) -> Result<()>;
    async fn delete_job(&self, id: &JobId) -> Result<()>;
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;
    async fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>>;
    async fn jobs_by_group(&self, group_id: &GroupId) -> Result<Vec<Job>>;

    async fn add_group(&self, group: Group) -> Result<()>;
    async fn get_group(&self, id: &GroupId) -> Result<Group>;
    async fn update_group(&self, group: Group) -> Result<()>;
    async fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>>;
    async fn find_active_group_for(&self, org_id: &str, app_version_id: &str) -> Result<Option<Group>>;

    async fn add_worker(&self, worker: Worker) -> Result<()>;
    async fn get_worker(&self, id: &WorkerId) -> Result<Worker>;
    async fn update_worker(&self, worker: Worker) -> Result<()>;
    async fn list_workers(&self, filter: &WorkerFilter) -> Result<Vec<Worker>>;
    async fn available_workers(&self, target: JobTarget) -> Result<Vec<Worker>>;

    /// Assign `job_id` to `worker_id`: adds the job to the worker's held
    /// set, marks the worker `busy`, sets the job's assigned worker and
    /// status to `queued`, stamps `updated_at`. Fails with `InvalidState`
    /// if the worker is `offline`.
    async fn assign(&self, job_id: &JobId, worker_id: &WorkerId, now: DateTime<Utc>) -> Result<()>;

    /// Release `job_id` from `worker_id`'s held set; the worker returns to
    /// `idle` once its held set is empty.
    async fn complete(&self, job_id: &JobId, worker_id: &WorkerId) -> Result<()>;

    async fn queue_statistics(&self) -> Result<QueueStatistics>;

    /// Delete terminal jobs whose `completed_at` predates `older_than`.
    /// Returns the number of jobs removed.
    async fn retention_sweep(&self, older_than: DateTime<Utc>) -> Result<usize>;
}
