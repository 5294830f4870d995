// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed store: one hash per entity (`job:<id>`, `group:<id>`,
//! `worker:<id>`) plus a set of live ids per entity kind (§4.1, §6 key
//! layout).
//!
//! Each hash carries a single `data` field holding the entity serialized as
//! JSON — nested composite fields (payload, metadata, job id sequences,
//! held-job sets) round-trip exactly this way without hand-decomposing them
//! into flat hash fields. Multi-key mutations go through one pipelined,
//! atomic batch so the server applies them without interleaving from this
//! client (§4.1 Remote backend); cross-entity atomicity beyond that relies
//! on the scheduler's single-instance authority, not on Redis transactions.

use crate::{GroupFilter, JobFilter, QueueStatistics, Store, WorkerFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use qg_core::{
    Group, GroupId, Job, JobId, JobStatus, JobTarget, OrchestratorError, Result, Worker, WorkerId,
    WorkerStatus,
};
use redis::AsyncCommands;

const JOBS_SET: &str = "jobs";
const GROUPS_SET: &str = "groups";
const WORKERS_SET: &str = "workers";

fn job_key(id: &JobId) -> String {
    format!("job:{id}")
}

fn group_key(id: &GroupId) -> String {
    format!("group:{id}")
}

fn worker_key(id: &WorkerId) -> String {
    format!("worker:{id}")
}

fn unavailable(err: impl std::fmt::Display) -> OrchestratorError {
    OrchestratorError::StoreUnavailable(err.to_string())
}

/// Redis-backed [`Store`] implementation.
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection> {
        self.pool.get().await.map_err(unavailable)
    }

    async fn read_entity<T: serde::de::DeserializeOwned>(
        &self,
        kind: &'static str,
        key: &str,
        id: &str,
    ) -> Result<T> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.hget(key, "data").await.map_err(unavailable)?;
        let raw = raw.ok_or_else(|| OrchestratorError::not_found(kind, id))?;
        serde_json::from_str(&raw).map_err(|e| OrchestratorError::Internal(e.to_string()))
    }

    async fn write_entity<T: serde::Serialize>(&self, key: &str, set: &str, id: &str, entity: &T) -> Result<()> {
        let raw = serde_json::to_string(entity).map_err(|e| OrchestratorError::Internal(e.to_string()))?;
        let mut conn = self.connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.hset(key, "data", raw);
        pipe.sadd(set, id);
        let _: () = pipe.query_async(&mut *conn).await.map_err(unavailable)?;
        Ok(())
    }

    async fn all_ids(&self, set: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        conn.smembers(set).await.map_err(unavailable)
    }

    async fn all_jobs(&self) -> Result<Vec<Job>> {
        let mut jobs = Vec::new();
        for id in self.all_ids(JOBS_SET).await? {
            if let Ok(job) = self.read_entity::<Job>("job", &job_key(&JobId::from_string(&id)), &id).await {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    async fn all_groups(&self) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        for id in self.all_ids(GROUPS_SET).await? {
            if let Ok(group) = self
                .read_entity::<Group>("group", &group_key(&GroupId::from_string(&id)), &id)
                .await
            {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    async fn all_workers(&self) -> Result<Vec<Worker>> {
        let mut workers = Vec::new();
        for id in self.all_ids(WORKERS_SET).await? {
            if let Ok(worker) = self
                .read_entity::<Worker>("worker", &worker_key(&WorkerId::from_string(&id)), &id)
                .await
            {
                workers.push(worker);
            }
        }
        Ok(workers)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn add_job(&self, job: Job) -> Result<()> {
        self.write_entity(&job_key(&job.id), JOBS_SET, job.id.as_str(), &job).await
    }

    async fn get_job(&self, id: &JobId) -> Result<Job> {
        self.read_entity("job", &job_key(id), id.as_str()).await
    }

    async fn update_job(&self, job: Job) -> Result<()> {
        self.get_job(&job.id).await?;
        self.write_entity(&job_key(&job.id), JOBS_SET, job.id.as_str(), &job).await
    }

    async fn delete_job(&self, id: &JobId) -> Result<()> {
        self.get_job(id).await?;
        let mut conn = self.connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.del(job_key(id));
        pipe.srem(JOBS_SET, id.as_str());
        let _: () = pipe.query_async(&mut *conn).await.map_err(unavailable)?;
        Ok(())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        Ok(self.all_jobs().await?.into_iter().filter(|job| filter.matches(job)).collect())
    }

    async fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>> {
        Ok(self.all_jobs().await?.into_iter().filter(|job| job.status == status).collect())
    }

    async fn jobs_by_group(&self, group_id: &GroupId) -> Result<Vec<Job>> {
        let group = self.get_group(group_id).await?;
        let mut jobs = Vec::new();
        for id in &group.job_ids {
            if let Ok(job) = self.get_job(id).await {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    async fn add_group(&self, group: Group) -> Result<()> {
        self.write_entity(&group_key(&group.id), GROUPS_SET, group.id.as_str(), &group)
            .await
    }

    async fn get_group(&self, id: &GroupId) -> Result<Group> {
        self.read_entity("group", &group_key(id), id.as_str()).await
    }

    async fn update_group(&self, group: Group) -> Result<()> {
        self.get_group(&group.id).await?;
        self.write_entity(&group_key(&group.id), GROUPS_SET, group.id.as_str(), &group)
            .await
    }

    async fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        Ok(self
            .all_groups()
            .await?
            .into_iter()
            .filter(|group| filter.matches(group))
            .collect())
    }

    async fn find_active_group_for(&self, org_id: &str, app_version_id: &str) -> Result<Option<Group>> {
        Ok(self
            .all_groups()
            .await?
            .into_iter()
            .find(|g| g.org_id == org_id && g.app_version_id == app_version_id && !g.status.is_terminal()))
    }

    async fn add_worker(&self, worker: Worker) -> Result<()> {
        self.write_entity(&worker_key(&worker.id), WORKERS_SET, worker.id.as_str(), &worker)
            .await
    }

    async fn get_worker(&self, id: &WorkerId) -> Result<Worker> {
        self.read_entity("worker", &worker_key(id), id.as_str()).await
    }

    async fn update_worker(&self, worker: Worker) -> Result<()> {
        self.get_worker(&worker.id).await?;
        self.write_entity(&worker_key(&worker.id), WORKERS_SET, worker.id.as_str(), &worker)
            .await
    }

    async fn list_workers(&self, filter: &WorkerFilter) -> Result<Vec<Worker>> {
        Ok(self
            .all_workers()
            .await?
            .into_iter()
            .filter(|worker| filter.matches(worker))
            .collect())
    }

    async fn available_workers(&self, target: JobTarget) -> Result<Vec<Worker>> {
        Ok(self
            .all_workers()
            .await?
            .into_iter()
            .filter(|w| w.accepts(target) && w.status == WorkerStatus::Idle && w.held_jobs.is_empty())
            .collect())
    }

    async fn assign(&self, job_id: &JobId, worker_id: &WorkerId, now: DateTime<Utc>) -> Result<()> {
        let mut worker = self.get_worker(worker_id).await?;
        if worker.status == WorkerStatus::Offline {
            return Err(OrchestratorError::invalid_state(format!(
                "cannot assign job {job_id} to offline worker {worker_id}"
            )));
        }
        let mut job = self.get_job(job_id).await?;

        worker.assign_job(*job_id);
        job.mark_queued(*worker_id, now);

        let job_raw = serde_json::to_string(&job).map_err(|e| OrchestratorError::Internal(e.to_string()))?;
        let worker_raw =
            serde_json::to_string(&worker).map_err(|e| OrchestratorError::Internal(e.to_string()))?;

        let mut conn = self.connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.hset(job_key(job_id), "data", job_raw);
        pipe.hset(worker_key(worker_id), "data", worker_raw);
        let _: () = pipe.query_async(&mut *conn).await.map_err(unavailable)?;
        Ok(())
    }

    async fn complete(&self, job_id: &JobId, worker_id: &WorkerId) -> Result<()> {
        let mut worker = self.get_worker(worker_id).await?;
        worker.release_job(job_id);
        let worker_raw =
            serde_json::to_string(&worker).map_err(|e| OrchestratorError::Internal(e.to_string()))?;
        let mut conn = self.connection().await?;
        let _: () = conn.hset(worker_key(worker_id), "data", worker_raw).await.map_err(unavailable)?;
        Ok(())
    }

    async fn queue_statistics(&self) -> Result<QueueStatistics> {
        let jobs = self.all_jobs().await?;
        let workers = self.all_workers().await?;
        let mut stats = QueueStatistics {
            total_jobs: jobs.len(),
            total_groups: self.all_ids(GROUPS_SET).await?.len(),
            total_workers: workers.len(),
            ..Default::default()
        };
        for job in &jobs {
            match job.status {
                JobStatus::Pending => stats.pending_jobs += 1,
                JobStatus::Queued => stats.queued_jobs += 1,
                JobStatus::Running => stats.running_jobs += 1,
                JobStatus::Completed => stats.completed_jobs += 1,
                JobStatus::Failed => stats.failed_jobs += 1,
                JobStatus::Cancelled => stats.cancelled_jobs += 1,
            }
        }
        for worker in &workers {
            match worker.status {
                WorkerStatus::Idle => stats.idle_workers += 1,
                WorkerStatus::Busy => stats.busy_workers += 1,
                WorkerStatus::Offline => stats.offline_workers += 1,
            }
        }
        Ok(stats)
    }

    async fn retention_sweep(&self, older_than: DateTime<Utc>) -> Result<usize> {
        let stale: Vec<JobId> = self
            .all_jobs()
            .await?
            .into_iter()
            .filter(|job| job.is_terminal() && job.completed_at.is_some_and(|t| t < older_than))
            .map(|job| job.id)
            .collect();
        for id in &stale {
            self.delete_job(id).await?;
        }
        Ok(stale.len())
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
