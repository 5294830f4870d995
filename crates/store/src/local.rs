// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory backend: one reentrant-free mutex guards three maps.
//!
//! All getters clone before returning so callers can never mutate stored
//! entities by aliasing (§4.1 Local backend).

use crate::{GroupFilter, JobFilter, QueueStatistics, Store, WorkerFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::Mutex;
use qg_core::{
    Group, GroupId, Job, JobId, JobStatus, JobTarget, OrchestratorError, Result, Worker, WorkerId,
    WorkerStatus,
};

#[derive(Default)]
struct State {
    jobs: IndexMap<JobId, Job>,
    groups: IndexMap<GroupId, Group>,
    workers: IndexMap<WorkerId, Worker>,
}

/// In-memory [`Store`] implementation.
pub struct LocalStore {
    state: Mutex<State>,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }
}

#[async_trait]
impl Store for LocalStore {
    async fn add_job(&self, job: Job) -> Result<()> {
        self.state.lock().jobs.insert(job.id, job);
        Ok(())
    }

    async fn get_job(&self, id: &JobId) -> Result<Job> {
        self.state
            .lock()
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| OrchestratorError::not_found("job", id.to_string()))
    }

    async fn update_job(&self, job: Job) -> Result<()> {
        let mut state = self.state.lock();
        if !state.jobs.contains_key(&job.id) {
            return Err(OrchestratorError::not_found("job", job.id.to_string()));
        }
        state.jobs.insert(job.id, job);
        Ok(())
    }

    async fn delete_job(&self, id: &JobId) -> Result<()> {
        let mut state = self.state.lock();
        state
            .jobs
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| OrchestratorError::not_found("job", id.to_string()))
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        Ok(self
            .state
            .lock()
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect())
    }

    async fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>> {
        Ok(self
            .state
            .lock()
            .jobs
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect())
    }

    async fn jobs_by_group(&self, group_id: &GroupId) -> Result<Vec<Job>> {
        let state = self.state.lock();
        let group = state
            .groups
            .get(group_id)
            .ok_or_else(|| OrchestratorError::not_found("group", group_id.to_string()))?;
        Ok(group
            .job_ids
            .iter()
            .filter_map(|id| state.jobs.get(id).cloned())
            .collect())
    }

    async fn add_group(&self, group: Group) -> Result<()> {
        self.state.lock().groups.insert(group.id, group);
        Ok(())
    }

    async fn get_group(&self, id: &GroupId) -> Result<Group> {
        self.state
            .lock()
            .groups
            .get(id)
            .cloned()
            .ok_or_else(|| OrchestratorError::not_found("group", id.to_string()))
    }

    async fn update_group(&self, group: Group) -> Result<()> {
        let mut state = self.state.lock();
        if !state.groups.contains_key(&group.id) {
            return Err(OrchestratorError::not_found("group", group.id.to_string()));
        }
        state.groups.insert(group.id, group);
        Ok(())
    }

    async fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        Ok(self
            .state
            .lock()
            .groups
            .values()
            .filter(|group| filter.matches(group))
            .cloned()
            .collect())
    }

    async fn find_active_group_for(&self, org_id: &str, app_version_id: &str) -> Result<Option<Group>> {
        Ok(self
            .state
            .lock()
            .groups
            .values()
            .find(|g| g.org_id == org_id && g.app_version_id == app_version_id && !g.status.is_terminal())
            .cloned())
    }

    async fn add_worker(&self, worker: Worker) -> Result<()> {
        self.state.lock().workers.insert(worker.id, worker);
        Ok(())
    }

    async fn get_worker(&self, id: &WorkerId) -> Result<Worker> {
        self.state
            .lock()
            .workers
            .get(id)
            .cloned()
            .ok_or_else(|| OrchestratorError::not_found("worker", id.to_string()))
    }

    async fn update_worker(&self, worker: Worker) -> Result<()> {
        let mut state = self.state.lock();
        if !state.workers.contains_key(&worker.id) {
            return Err(OrchestratorError::not_found("worker", worker.id.to_string()));
        }
        state.workers.insert(worker.id, worker);
        Ok(())
    }

    async fn list_workers(&self, filter: &WorkerFilter) -> Result<Vec<Worker>> {
        Ok(self
            .state
            .lock()
            .workers
            .values()
            .filter(|worker| filter.matches(worker))
            .cloned()
            .collect())
    }

    async fn available_workers(&self, target: JobTarget) -> Result<Vec<Worker>> {
        Ok(self
            .state
            .lock()
            .workers
            .values()
            .filter(|w| w.accepts(target) && w.status == WorkerStatus::Idle && w.held_jobs.is_empty())
            .cloned()
            .collect())
    }

    async fn assign(&self, job_id: &JobId, worker_id: &WorkerId, now: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock();
        {
            let worker = state
                .workers
                .get(worker_id)
                .ok_or_else(|| OrchestratorError::not_found("worker", worker_id.to_string()))?;
            if worker.status == WorkerStatus::Offline {
                return Err(OrchestratorError::invalid_state(format!(
                    "cannot assign job {job_id} to offline worker {worker_id}"
                )));
            }
        }
        if !state.jobs.contains_key(job_id) {
            return Err(OrchestratorError::not_found("job", job_id.to_string()));
        }

        state
            .workers
            .get_mut(worker_id)
            .ok_or_else(|| OrchestratorError::not_found("worker", worker_id.to_string()))?
            .assign_job(*job_id);
        state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| OrchestratorError::not_found("job", job_id.to_string()))?
            .mark_queued(*worker_id, now);
        Ok(())
    }

    async fn complete(&self, job_id: &JobId, worker_id: &WorkerId) -> Result<()> {
        let mut state = self.state.lock();
        let worker = state
            .workers
            .get_mut(worker_id)
            .ok_or_else(|| OrchestratorError::not_found("worker", worker_id.to_string()))?;
        worker.release_job(job_id);
        Ok(())
    }

    async fn queue_statistics(&self) -> Result<QueueStatistics> {
        let state = self.state.lock();
        let mut stats = QueueStatistics {
            total_jobs: state.jobs.len(),
            total_groups: state.groups.len(),
            total_workers: state.workers.len(),
            ..Default::default()
        };
        for job in state.jobs.values() {
            match job.status {
                JobStatus::Pending => stats.pending_jobs += 1,
                JobStatus::Queued => stats.queued_jobs += 1,
                JobStatus::Running => stats.running_jobs += 1,
                JobStatus::Completed => stats.completed_jobs += 1,
                JobStatus::Failed => stats.failed_jobs += 1,
                JobStatus::Cancelled => stats.cancelled_jobs += 1,
            }
        }
        for worker in state.workers.values() {
            match worker.status {
                WorkerStatus::Idle => stats.idle_workers += 1,
                WorkerStatus::Busy => stats.busy_workers += 1,
                WorkerStatus::Offline => stats.offline_workers += 1,
            }
        }
        Ok(stats)
    }

    async fn retention_sweep(&self, older_than: DateTime<Utc>) -> Result<usize> {
        let mut state = self.state.lock();
        let stale: Vec<JobId> = state
            .jobs
            .values()
            .filter(|job| job.is_terminal() && job.completed_at.is_some_and(|t| t < older_than))
            .map(|job| job.id)
            .collect();
        for id in &stale {
            state.jobs.shift_remove(id);
        }
        Ok(stale.len())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
