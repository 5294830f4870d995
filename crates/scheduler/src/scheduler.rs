// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission front-end (§4.3), worker polling front-end (§4.4), and the
//! retry/cancel operations (§4.2) — everything driven by a request handler
//! rather than the background sweep.

use crate::config::SchedulerConfig;
use qg_core::{Clock, Group, Job, JobId, JobPayload, JobStatus, Result, Worker, WorkerId};
use qg_store::Store;
use std::sync::Arc;

/// The result of a worker heartbeat (§4.4).
#[derive(Debug, Clone)]
pub struct Heartbeat {
    pub worker: Worker,
    pub next_job: Option<Job>,
}

/// Owns the store and clock and drives every scheduler operation.
pub struct Scheduler<C: Clock> {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) clock: C,
    pub(crate) config: SchedulerConfig,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(store: Arc<dyn Store>, clock: C, config: SchedulerConfig) -> Self {
        Self { store, clock, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The store backing this scheduler, for callers that need to inspect
    /// state the scheduler's own API doesn't expose directly.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Submission front-end: validate, construct, store, then fold into a
    /// group (§4.3).
    pub async fn submit_job(&self, payload: JobPayload) -> Result<Job> {
        payload.validate()?;
        let job = Job::new(payload, self.config.max_retries, &self.clock);
        self.store.add_job(job.clone()).await?;
        self.queue_job(&job).await?;
        self.store.get_job(&job.id).await
    }

    /// Grouping logic run on a freshly-stored job (§4.2 `queue_job`).
    ///
    /// Mutually exclusive with the sweep's assignment phase on the same
    /// groups — both go through the same store, whose compound operations
    /// are each a single critical section.
    pub(crate) async fn queue_job(&self, job: &Job) -> Result<()> {
        let existing = self
            .store
            .find_active_group_for(&job.payload.org_id, &job.payload.app_version_id)
            .await?;

        match existing {
            Some(mut group) => {
                group.push_job(job.id);
                self.store.update_group(group).await?;
            }
            None => {
                let mut group = Group::new(
                    job.payload.org_id.clone(),
                    job.payload.app_version_id.clone(),
                    self.clock.now(),
                );
                group.push_job(job.id);
                self.store.add_group(group).await?;
            }
        }

        let mut job = job.clone();
        job.status = JobStatus::Pending;
        job.updated_at = self.clock.now();
        self.store.update_job(job).await
    }

    /// Explicit retry of a `failed` job (§4.2 Retry). Re-enters the
    /// submission path so the job is re-grouped.
    pub async fn retry_job(&self, job_id: &JobId) -> Result<Job> {
        let mut job = self.store.get_job(job_id).await?;
        job.retry(self.clock.now())?;
        self.store.update_job(job.clone()).await?;
        self.queue_job(&job).await?;
        self.store.get_job(job_id).await
    }

    /// Explicit cancel of a non-terminal job (§4.2 Cancel).
    pub async fn cancel_job(&self, job_id: &JobId) -> Result<Job> {
        let mut job = self.store.get_job(job_id).await?;
        let worker_id = job.assigned_worker;
        job.cancel(self.clock.now())?;
        self.store.update_job(job.clone()).await?;
        if let Some(worker_id) = worker_id {
            self.store.complete(job_id, &worker_id).await?;
        }
        Ok(job)
    }

    /// Worker polling front-end (§4.4): refresh liveness, return the next
    /// assigned job if any. `NotFound` on an unknown worker id tells the
    /// caller to re-register.
    pub async fn heartbeat(&self, worker_id: &WorkerId) -> Result<Heartbeat> {
        let mut worker = self.store.get_worker(worker_id).await?;
        worker.record_heartbeat(self.clock.now());
        self.store.update_worker(worker.clone()).await?;

        let next_job = self.next_job_for(&worker).await?;
        Ok(Heartbeat { worker, next_job })
    }

    /// Select the next job to hand to a worker: queued, assigned to this
    /// worker, target accepted, ordered by priority desc then created_at
    /// asc (§4.2 Next-job lookup).
    async fn next_job_for(&self, worker: &Worker) -> Result<Option<Job>> {
        let mut candidates: Vec<Job> = self
            .store
            .jobs_by_status(JobStatus::Queued)
            .await?
            .into_iter()
            .filter(|job| job.assigned_worker == Some(worker.id) && worker.accepts(job.payload.target))
            .collect();

        candidates.sort_by(|a, b| {
            b.payload
                .priority
                .cmp(&a.payload.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(candidates.into_iter().next())
    }

    /// Worker registration: not named in §4 as a distinct front-end but
    /// required by the §6 `POST /workers` boundary contract.
    pub async fn register_worker(&self, worker: Worker) -> Result<Worker> {
        self.store.add_worker(worker.clone()).await?;
        Ok(worker)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
