// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job groups: jobs sharing `(org_id, app_version_id)` so a worker installs
//! the app under test once and runs every grouped job (spec §2, §3).

use crate::job::JobId;
use crate::status::{JobPriority, JobStatus};
use crate::worker::WorkerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Globally unique identifier for a job group.
    pub struct GroupId("grp-");
}

/// A coalesced batch of jobs sharing an org and app version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub org_id: String,
    pub app_version_id: String,
    /// Member jobs in submission order; the store is the source of truth
    /// for each job's current record.
    pub job_ids: Vec<JobId>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub assigned_worker: Option<WorkerId>,
}

impl Group {
    pub fn new(org_id: impl Into<String>, app_version_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: GroupId::new(),
            org_id: org_id.into(),
            app_version_id: app_version_id.into(),
            job_ids: Vec::new(),
            status: JobStatus::Pending,
            created_at: now,
            assigned_worker: None,
        }
    }

    /// Whether a job may still be folded into this group: only groups that
    /// have not yet been handed to a worker accept new members (§9 open
    /// question — resolved: non-pending groups are closed to new jobs).
    pub fn accepts_new_jobs(&self) -> bool {
        self.status == JobStatus::Pending
    }

    pub fn push_job(&mut self, job_id: JobId) {
        self.job_ids.push(job_id);
    }

    pub fn assign(&mut self, worker_id: WorkerId) {
        self.status = JobStatus::Queued;
        self.assigned_worker = Some(worker_id);
    }

    /// Highest priority among the given member priorities — this is the
    /// priority the group is scheduled at (§4.2 priority-ordered assignment).
    pub fn effective_priority(priorities: impl IntoIterator<Item = JobPriority>) -> JobPriority {
        priorities.into_iter().max().unwrap_or_default()
    }

    /// A group's aggregate status derived from its members' statuses:
    /// completed only once every member is completed, failed if any member
    /// is failed and none are still active, otherwise the most-advanced
    /// in-flight status.
    pub fn aggregate_status(member_statuses: &[JobStatus]) -> JobStatus {
        if member_statuses.is_empty() {
            return JobStatus::Pending;
        }
        if member_statuses.iter().all(|s| *s == JobStatus::Completed) {
            return JobStatus::Completed;
        }
        if member_statuses
            .iter()
            .all(|s| matches!(s, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled))
        {
            if member_statuses.iter().any(|s| *s == JobStatus::Failed) {
                return JobStatus::Failed;
            }
            return JobStatus::Cancelled;
        }
        if member_statuses.iter().any(|s| *s == JobStatus::Running) {
            return JobStatus::Running;
        }
        if member_statuses.iter().any(|s| *s == JobStatus::Queued) {
            return JobStatus::Queued;
        }
        JobStatus::Pending
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
