// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The background sweep: assignment, liveness, job-timeout (§4.2 Scheduler
//! sweep). Each tick catches and logs its own failures rather than letting
//! one bad group or worker stop the loop (§7 Policy).

use crate::config::JOB_EXECUTION_TIMEOUT;
use crate::scheduler::Scheduler;
use qg_core::{Clock, JobStatus};
use qg_store::GroupFilter;
use tokio_util::sync::CancellationToken;

/// Counts produced by one sweep tick, useful for tests and `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub groups_assigned: usize,
    pub workers_marked_offline: usize,
    pub jobs_requeued: usize,
    pub jobs_failed_on_worker_loss: usize,
    pub jobs_timed_out: usize,
}

impl<C: Clock> Scheduler<C> {
    /// Run one full sweep tick: assignment, then liveness, then job-timeout.
    pub async fn run_sweep_tick(&self) -> SweepReport {
        let mut report = SweepReport::default();

        if let Err(error) = self.sweep_assignment(&mut report).await {
            tracing::warn!(%error, "assignment phase failed this tick");
        }
        if let Err(error) = self.sweep_liveness(&mut report).await {
            tracing::warn!(%error, "liveness phase failed this tick");
        }
        if let Err(error) = self.sweep_job_timeout(&mut report).await {
            tracing::warn!(%error, "job-timeout phase failed this tick");
        }

        report
    }

    async fn sweep_assignment(&self, report: &mut SweepReport) -> qg_core::Result<()> {
        let mut pending_groups: Vec<_> = self
            .store
            .list_groups(&GroupFilter {
                status: Some(JobStatus::Pending),
                ..Default::default()
            })
            .await?
            .into_iter()
            .filter(|g| !g.job_ids.is_empty())
            .collect();

        let mut priorities = std::collections::HashMap::new();
        for group in &pending_groups {
            let jobs = self.store.jobs_by_group(&group.id).await?;
            let priority = qg_core::Group::effective_priority(jobs.iter().map(|j| j.payload.priority));
            priorities.insert(group.id, priority);
        }

        pending_groups.sort_by(|a, b| {
            priorities[&b.id]
                .cmp(&priorities[&a.id])
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        for group in pending_groups {
            let jobs = self.store.jobs_by_group(&group.id).await?;
            let Some(first) = jobs.first() else { continue };
            let target = first.payload.target;

            let available = self.store.available_workers(target).await?;
            let Some(worker) = available.into_iter().next() else {
                continue;
            };

            for job in &jobs {
                self.store.assign(&job.id, &worker.id, self.clock.now()).await?;
            }

            let mut group = group;
            group.assign(worker.id);
            self.store.update_group(group).await?;
            report.groups_assigned += 1;
        }

        Ok(())
    }

    async fn sweep_liveness(&self, report: &mut SweepReport) -> qg_core::Result<()> {
        let now = self.clock.now();
        let timeout = chrono::Duration::from_std(self.config.worker_timeout)
            .unwrap_or_else(|_| chrono::Duration::seconds(300));

        let workers = self.store.list_workers(&Default::default()).await?;
        for mut worker in workers {
            if worker.status == qg_core::WorkerStatus::Offline {
                continue;
            }
            if !worker.is_stale(now, timeout) {
                continue;
            }

            worker.mark_offline();
            let held: Vec<_> = worker.held_jobs.iter().copied().collect();
            self.store.update_worker(worker).await?;
            report.workers_marked_offline += 1;

            for job_id in held {
                let mut job = self.store.get_job(&job_id).await?;
                if !matches!(job.status, JobStatus::Queued | JobStatus::Running) {
                    continue;
                }
                if job.reassign_after_worker_loss(now) {
                    report.jobs_requeued += 1;
                } else {
                    report.jobs_failed_on_worker_loss += 1;
                }
                self.store.update_job(job).await?;
            }
        }
        Ok(())
    }

    async fn sweep_job_timeout(&self, report: &mut SweepReport) -> qg_core::Result<()> {
        let now = self.clock.now();
        let timeout = chrono::Duration::from_std(JOB_EXECUTION_TIMEOUT).unwrap_or_else(|_| chrono::Duration::minutes(30));

        let running = self.store.jobs_by_status(JobStatus::Running).await?;
        for mut job in running {
            let Some(started_at) = job.started_at else { continue };
            if now.signed_duration_since(started_at) < timeout {
                continue;
            }

            let worker_id = job.assigned_worker;
            job.timeout(now);
            self.store.update_job(job.clone()).await?;
            if let Some(worker_id) = worker_id {
                self.store.complete(&job.id, &worker_id).await?;
            }
            report.jobs_timed_out += 1;
        }
        Ok(())
    }

    /// Run the sweep forever at `schedule_interval`, stopping when `token`
    /// is cancelled (§9 Scheduler background thread).
    pub async fn run(&self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.schedule_interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("scheduler sweep loop stopping");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.run_sweep_tick().await;
                    tracing::debug!(?report, "sweep tick complete");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
